use specboard_core::config::Config;
use specboard_core::recent::{JsonFileStore, MemoryStore, RecentStore};

pub fn run(mut config: Config, port: Option<u16>, open_browser: bool) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let store: Box<dyn RecentStore> = match JsonFileStore::default_location() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "recent projects will not persist");
            Box::new(MemoryStore::default())
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener =
            tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port)).await?;
        let actual_port = listener.local_addr()?.port();
        println!("specboard API → http://localhost:{actual_port}/api");

        tokio::select! {
            res = specboard_server::serve_on(config, store, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
