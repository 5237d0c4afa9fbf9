use tracing_subscriber::{FmtSubscriber, EnvFilter};

mod cli;

fn main() {
    use tokio::runtime::Builder;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        println!("failed to initialize global tracing subscriber: {}", err);
    }

    let rt = match Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build() {
        Ok(rt) => rt,
        Err(err) => {
            println!("failed to start tokio runtime: {}", err);

            std::process::exit(1);
        }
    };

    tracing::event!(
        tracing::Level::DEBUG,
        "started tokio runtime"
    );

    if let Err(err) = rt.block_on(cli::run()) {
        println!("{}", err);

        std::process::exit(1);
    }
}
