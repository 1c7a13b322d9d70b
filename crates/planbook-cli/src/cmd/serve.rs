use anyhow::anyhow;
use planbook_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: u16, no_open: bool) -> anyhow::Result<()> {
    let config = Config::load(root).map_err(|e| anyhow!("{e}"))?;

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "planbook API for '{}' → http://localhost:{actual_port}",
            config.organization
        );

        tokio::select! {
            res = planbook_server::serve_on(root_buf, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
