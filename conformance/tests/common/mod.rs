//! Shared harness: serves an axum router on an ephemeral port.

#![allow(dead_code)]

use std::net::TcpListener;

use axum::Router;

/// Serves `router` on `127.0.0.1:<random port>` from a background thread and
/// returns its API root.
pub fn spawn(router: Router) -> String {
    let std_listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, router).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A fresh reference backend.
pub fn spawn_reference() -> String {
    spawn(reference_backend::app())
}
