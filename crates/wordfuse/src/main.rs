use clap::Parser;
use wordfuse::{ServerArgs, WordfuseError, WordfuseServerBuilder};

#[tokio::main]
async fn main() -> Result<(), WordfuseError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wordfuse=info,wordfuse_room=info,wordfuse_session=info,wordfuse_dictionary=warn".into()
            }),
        )
        .init();

    let args = ServerArgs::parse();
    let dictionary = args.lexicon().await?;

    let server = WordfuseServerBuilder::new()
        .bind(&args.bind)
        .room_config(args.room_config())
        .session_config(args.session_config())
        .build(dictionary)
        .await?;

    tracing::info!(
        addr = %server.local_addr()?,
        min_bomb_secs = args.min_bomb_secs,
        max_bomb_secs = args.max_bomb_secs,
        "starting wordfuse server"
    );

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
