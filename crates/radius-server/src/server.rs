use crate::config::{Config, ConfigError};
use radius_codec::attributes::AttributeType;
use radius_codec::password::decrypt_user_password;
use radius_codec::{Code, Packet, PacketError};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{debug, info, info_span, warn, Instrument};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Authentication handler trait
///
/// Implement this trait to provide custom authentication logic. The server
/// calls it with the User-Name and the recovered User-Password of every
/// Access-Request it answers.
pub trait AuthHandler: Send + Sync {
    /// Returns true if the credentials are accepted
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Simple in-memory authentication handler
#[derive(Debug, Default)]
pub struct SimpleAuthHandler {
    users: HashMap<String, String>,
}

impl SimpleAuthHandler {
    pub fn new() -> Self {
        SimpleAuthHandler {
            users: HashMap::new(),
        }
    }

    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.users.insert(username.into(), password.into());
    }
}

impl AuthHandler for SimpleAuthHandler {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|p| p == password)
            .unwrap_or(false)
    }
}

/// RADIUS Server configuration
pub struct ServerConfig {
    /// Bind address for the server
    pub bind_addr: SocketAddr,
    /// Shared secret for authenticating clients
    pub secret: Vec<u8>,
    /// Authentication handler
    pub auth_handler: Arc<dyn AuthHandler>,
    /// Upper bound on requests in flight; `None` leaves it unbounded
    pub max_concurrent_requests: Option<usize>,
}

impl ServerConfig {
    pub fn new(
        bind_addr: SocketAddr,
        secret: impl Into<Vec<u8>>,
        auth_handler: Arc<dyn AuthHandler>,
    ) -> Self {
        ServerConfig {
            bind_addr,
            secret: secret.into(),
            auth_handler,
            max_concurrent_requests: None,
        }
    }

    /// Create server config from a file-level Config object
    ///
    /// Only the listen address is checked here; `Config::from_file` has
    /// already validated the rest. Port 0 is accepted so tests can bind to an
    /// OS-assigned port.
    pub fn from_config(
        config: &Config,
        auth_handler: Arc<dyn AuthHandler>,
    ) -> Result<Self, ServerError> {
        let bind_addr = config.socket_addr()?;

        Ok(ServerConfig {
            bind_addr,
            secret: config.secret.clone().into_bytes(),
            auth_handler,
            max_concurrent_requests: config.max_concurrent_requests,
        })
    }

    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = Some(limit);
        self
    }
}

/// RADIUS Server
pub struct RadiusServer {
    config: Arc<ServerConfig>,
    socket: Arc<UdpSocket>,
    limiter: Option<Arc<Semaphore>>,
}

impl RadiusServer {
    /// Create a new RADIUS server
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let socket = UdpSocket::bind(config.bind_addr).await?;
        info!(
            bind_addr = %socket.local_addr()?,
            "RADIUS server listening"
        );

        let limiter = config
            .max_concurrent_requests
            .filter(|&limit| limit > 0)
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Ok(RadiusServer {
            config: Arc::new(config),
            socket: Arc::new(socket),
            limiter,
        })
    }

    /// Bind and serve until the socket fails
    pub async fn listen_and_serve(config: ServerConfig) -> Result<(), ServerError> {
        let server = Self::new(config).await?;
        server.run().await
    }

    /// Get the local address the server is listening on
    ///
    /// This is useful for testing when binding to port 0 (OS-assigned port)
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.socket.local_addr().map_err(ServerError::from)
    }

    /// Start the server and handle incoming requests
    ///
    /// Each datagram is handled in its own task. Only a non-transient
    /// receive error ends the loop.
    pub async fn run(&self) -> Result<(), ServerError> {
        let mut buf = vec![0u8; Packet::MAX_PACKET_SIZE];

        loop {
            let (len, addr) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    warn!(error = %e, "Transient receive error");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let permit = match &self.limiter {
                Some(limiter) => match Arc::clone(limiter).try_acquire_owned() {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        warn!(
                            client_addr = %addr,
                            "Concurrent request limit reached, dropping datagram"
                        );
                        continue;
                    }
                },
                None => None,
            };

            let data = buf[..len].to_vec();

            // Spawn a task to handle this request
            let config = Arc::clone(&self.config);
            let socket = Arc::clone(&self.socket);
            let span = info_span!("request", client_addr = %addr);

            tokio::spawn(
                async move {
                    let _permit = permit;
                    if let Err(e) = Self::handle_request(data, addr, config, socket).await {
                        warn!(error = %e, "Error handling request");
                    }
                }
                .instrument(span),
            );
        }
    }

    /// Handle a single RADIUS datagram
    ///
    /// Dropped datagrams and failed sends are logged here and end the task
    /// quietly.
    async fn handle_request(
        data: Vec<u8>,
        addr: SocketAddr,
        config: Arc<ServerConfig>,
        socket: Arc<UdpSocket>,
    ) -> Result<(), ServerError> {
        let response =
            match process_datagram(&data, &config.secret, config.auth_handler.as_ref()) {
                Ok(Some(response)) => response,
                Ok(None) => return Ok(()),
                Err(e) => {
                    match malformed_attribute_name(&e) {
                        Some(attribute) => warn!(
                            client_addr = %addr,
                            len = data.len(),
                            attribute,
                            error = %e,
                            "Dropped malformed datagram"
                        ),
                        None => warn!(
                            client_addr = %addr,
                            len = data.len(),
                            error = %e,
                            "Dropped malformed datagram"
                        ),
                    }
                    return Ok(());
                }
            };

        let response_data = response.encode()?;
        if let Err(e) = socket.send_to(&response_data, addr).await {
            warn!(
                client_addr = %addr,
                request_id = response.identifier,
                error = %e,
                "Failed to send response"
            );
            return Ok(());
        }

        debug!(
            response_type = %response.code,
            client_addr = %addr,
            request_id = response.identifier,
            "Sent RADIUS response"
        );

        Ok(())
    }
}

/// Turn one received datagram into the reply to send, if any
///
/// Framing and attribute errors are returned and the datagram gets no
/// answer. Codes other than Access-Request yield `Ok(None)`. Every
/// Access-Request is answered with Access-Accept or Access-Reject; requests
/// whose credentials cannot be recovered are rejected.
pub fn process_datagram(
    data: &[u8],
    secret: &[u8],
    auth_handler: &dyn AuthHandler,
) -> Result<Option<Packet>, ServerError> {
    let request = Packet::decode(data, data.len())?;

    debug!(
        packet_type = %request.code,
        request_id = request.identifier,
        len = request.length,
        "Received RADIUS packet"
    );

    if request.code != Code::AccessRequest {
        debug!(
            packet_type = %request.code,
            request_id = request.identifier,
            "Ignoring unsupported packet type"
        );
        return Ok(None);
    }

    let attributes = request.decoded_attributes()?;

    let username = match attributes.get(AttributeType::UserName as u8) {
        Some(value) => match std::str::from_utf8(value) {
            Ok(username) => username,
            Err(_) => return Ok(Some(reject(&request, secret, None, "User-Name is not UTF-8"))),
        },
        None => return Ok(Some(reject(&request, secret, None, "Missing User-Name"))),
    };

    let Some(hidden) = attributes.get(AttributeType::UserPassword as u8) else {
        return Ok(Some(reject(
            &request,
            secret,
            Some(username),
            "Missing User-Password",
        )));
    };

    let password = match decrypt_user_password(hidden, secret, &request.authenticator) {
        Ok(password) => password,
        Err(e) => {
            let reason = format!("Unreadable User-Password: {}", e);
            return Ok(Some(reject(&request, secret, Some(username), &reason)));
        }
    };

    let Ok(password) = String::from_utf8(password) else {
        return Ok(Some(reject(
            &request,
            secret,
            Some(username),
            "User-Password is not UTF-8",
        )));
    };

    if auth_handler.authenticate(username, &password) {
        info!(
            username = %username,
            request_id = request.identifier,
            "Authentication successful"
        );
        Ok(Some(Packet::access_accept(&request, secret)))
    } else {
        Ok(Some(reject(
            &request,
            secret,
            Some(username),
            "Authentication failed",
        )))
    }
}

fn reject(request: &Packet, secret: &[u8], username: Option<&str>, reason: &str) -> Packet {
    warn!(
        username = username.unwrap_or("<none>"),
        request_id = request.identifier,
        reason,
        "Rejecting Access-Request"
    );
    Packet::access_reject(request, secret)
}

/// Dictionary name of the attribute that made a datagram undecodable
fn malformed_attribute_name(error: &ServerError) -> Option<&'static str> {
    match error {
        ServerError::Packet(PacketError::MalformedAttribute { attr_type, .. }) => {
            AttributeType::from_u8(*attr_type).map(AttributeType::name)
        }
        _ => None,
    }
}

/// Receive errors that concern a single datagram rather than the socket
fn is_transient(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionRefused
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
