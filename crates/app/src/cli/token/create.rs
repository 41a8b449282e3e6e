use clap::Args;
use jiff::Timestamp;
use pawcart_app::{auth::PgAuthService, domain::users::records::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User the session is issued for
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if let Some(expires_at) = args.expires_at
        && expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let service = PgAuthService::new(crate::cli::connect(&args.database_url).await?);

    let issued = service
        .issue_session(UserUuid::from_uuid(args.user_uuid), args.expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("session_uuid: {}", issued.session.uuid);
    println!("user_uuid: {}", issued.session.user_uuid);
    println!("created_at: {}", issued.session.created_at);
    if let Some(expires_at) = issued.session.expires_at {
        println!("expires_at: {expires_at}");
    }
    println!("bearer_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
