use super::api::DaliApi;
use crate::error::DynResult;
use hyper::header;
use hyper::http::StatusCode;
use hyper::service::{make_service_fn, service_fn};
use hyper::Method;
use hyper::{Body, Request, Response, Server};
use log::{debug, info};
use std::convert::Infallible;
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub struct ServerConfig {
    bind_addr: Option<IpAddr>,
    port: Option<u16>,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            bind_addr: None,
            port: None,
        }
    }

    pub fn port(mut self, p: u16) -> Self {
        self.port = Some(p);
        self
    }
    pub fn bind_addr(mut self, a: IpAddr) -> Self {
        self.bind_addr = Some(a);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

async fn handle(api: Arc<DaliApi>, req: Request<Body>) -> DynResult<Response<Body>> {
    match req.method() {
        &Method::GET => {
            debug!("GET {}", req.uri());
            let reply = api.handle(req.uri().path(), req.uri().query()).await;
            Response::builder()
                .status(reply.status)
                .header(header::CONTENT_TYPE, reply.content_type)
                .body(Body::from(reply.body))
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }
        m => Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(format!("Method {m} not supported")))
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

pub fn setup_server(
    conf: ServerConfig,
    api: DaliApi,
) -> (impl Future<Output = Result<(), hyper::Error>>, IpAddr, u16) {
    let port = conf.port.unwrap_or(0);
    let bind_addr = conf
        .bind_addr
        .unwrap_or_else(|| IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
    let socket_addr = SocketAddr::new(bind_addr, port);
    let api = Arc::new(api);
    let make_service = make_service_fn(move |_conn| {
        let api = api.clone();
        async move { Ok::<_, Infallible>(service_fn(move |req| handle(api.clone(), req))) }
    });
    let server = Server::bind(&socket_addr).serve(make_service);
    let port = server.local_addr().port();
    let addr = server.local_addr().ip();
    info!("Listening on {}:{}", addr, port);
    (server, addr, port)
}
