//! `boardroom-relay`: the room relay server.

use clap::Parser;
use log::{error, info};

use boardroom::relay::{RelayServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "boardroom-relay",
    version,
    about = "Relay presence, chat and game state between two-player game rooms"
)]
struct Cli {
    /// Address to listen on
    #[arg(short = 'b', long = "bind", value_name = "ADDR", default_value = "127.0.0.1:9090")]
    bind: String,
    /// Per-connection outbound queue length; messages beyond it are dropped
    #[arg(long, value_name = "N", default_value_t = 256)]
    outbound_capacity: usize,
    /// Deliver game chat only to rooms sharing the sender's room name
    #[arg(long)]
    room_scoped_game_chat: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = ServerConfig::default()
        .with_bind_addr(cli.bind)
        .with_outbound_capacity(cli.outbound_capacity)
        .with_room_scoped_game_chat(cli.room_scoped_game_chat);

    info!("Starting boardroom relay...");
    let server = RelayServer::new(config);
    if let Err(e) = server.run().await {
        error!("Relay stopped: {e}");
        std::process::exit(1);
    }
}
