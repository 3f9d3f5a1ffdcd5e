use listenfd::ListenFd;
use std::io;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

/// Binds the http listener.
///
/// When neither a host nor a port is requested, a socket handed over by `systemfd` / `listenfd` is
/// preferred. Otherwise the missing half of the address is taken from `default`.
pub async fn create_listener(
    (host, port): (Option<IpAddr>, Option<u16>),
    default: SocketAddr,
) -> io::Result<TcpListener> {
    if host.is_none() && port.is_none() {
        let mut listenfd = ListenFd::from_env();
        if let Some(listener) = listenfd.take_tcp_listener(0)? {
            listener.set_nonblocking(true)?;
            tracing::debug!("using inherited listener");
            return TcpListener::from_std(listener);
        }
    }

    let address = SocketAddr::new(host.unwrap_or(default.ip()), port.unwrap_or(default.port()));
    tracing::debug!(%address, "binding listener");
    TcpListener::bind(address).await
}
