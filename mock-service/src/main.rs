use mock_service::MockState;
use std::net::SocketAddr;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_env_filter("mock_service=debug")
        .init();

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("mock ticket service listening on {addr}");
    mock_service::run(addr, MockState::new()).await;
}
