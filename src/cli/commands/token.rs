use clap::Args;

use crate::auth::{generate_jwt, Claims};
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Username to embed in the token
    pub username: String,

    /// Grant admin rights
    #[arg(long)]
    pub admin: bool,

    /// Token lifetime in hours (defaults to the configured expiry)
    #[arg(long)]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs) -> anyhow::Result<()> {
    let hours = args
        .hours
        .unwrap_or(config::config().security.jwt_expiry_hours);
    let claims = Claims::with_expiry(args.username, args.admin, hours);
    let token = generate_jwt(&claims)?;

    println!("{}", token);
    Ok(())
}
