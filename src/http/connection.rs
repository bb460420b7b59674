use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{error, info};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::route::router::Router;
use crate::route::token::Segment;

const READ_CHUNK: usize = 4096;

pub struct Connection<S = TcpStream> {
    stream: S,
    buffer: BytesMut,
    router: Arc<Router<Segment>>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router<Segment>>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            router,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = Self::handle_request(&self.router, req);
                    let head_only = req.method() == Some(Method::HEAD);
                    let keep_alive = req.keep_alive();

                    let writer = ResponseWriter::new(&response, head_only);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading;
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Err(anyhow::anyhow!("HTTP parse error: {}", e));
                }
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }
        }
    }

    fn handle_request(router: &Router<Segment>, req: &Request) -> Response {
        let response = match router.handle(req) {
            Ok(Some(response)) => response,
            // No static file layer is mounted in front of the router.
            Ok(None) => Response::not_found(),
            Err(e) => {
                error!(method = %req.method, path = %req.path, error = %e, "unhandled signal");
                Response::internal_error()
            }
        };

        info!(
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            "request handled"
        );

        response
    }
}
