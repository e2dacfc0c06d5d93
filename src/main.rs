//! Host-side helper: `cargo run [port]` builds the WASM bundle into
//! `static/pkg` and serves `static/` on a local HTTP port.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::process::Command;
    use std::{env, thread, time::Duration};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port: u16 = match env::args().nth(1).map(|arg| arg.parse()) {
        None => 8000,
        Some(Ok(port)) => port,
        Some(Err(err)) => {
            log::error!("invalid port: {err}");
            std::process::exit(2);
        }
    };

    log::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("wasm-pack failed ({st})");
            std::process::exit(1);
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH, serving whatever is already in static/pkg");
        }
    }

    log::info!("serving http://127.0.0.1:{port}");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            log::error!("failed to start http server: {err}");
            std::process::exit(1);
        }
    };

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                log::warn!("http server exited ({status})");
                std::process::exit(status.code().unwrap_or(1));
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                log::error!("lost track of http server: {err}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
