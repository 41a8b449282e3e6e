//! Auth middleware for the supporting cart, order and address routes.

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::{BearerError, authenticate},
    extensions::*,
    state::State,
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let user = match authenticate(req, state.app.auth.as_ref()).await {
        Ok(user) => user,
        Err(BearerError::Missing) => {
            res.render(
                StatusError::unauthorized().brief("Missing or invalid Authorization header"),
            );

            return;
        }
        Err(BearerError::Invalid) => {
            res.render(StatusError::unauthorized().brief("Invalid session token"));

            return;
        }
        Err(BearerError::Internal) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_user_uuid(user);

    ctrl.call_next(req, depot, res).await;
}
