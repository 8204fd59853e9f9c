use crate::{Error, Logger};
use hyper::{
    body::HttpBody,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, StatusCode,
};
use regex::Regex;
use std::{collections::HashMap, convert::Infallible, future::Future, net::SocketAddr, pin::Pin, sync::Arc};

/// Path pattern with `{name}` placeholders, each matching one path segment.
pub struct DynamicUri {
    regex: Regex,
    parameters: HashMap<String, usize>,
}

impl DynamicUri {
    pub fn new(uri: &str) -> Result<Self, Error> {
        let placeholder = Regex::new(r"\{([^\{]*)\}").map_err(|error| Error::new(error.to_string()))?;
        let mut offset = 0;
        let mut index = 1;
        let mut chunks = Vec::new();
        let mut parameters = HashMap::new();
        for occurence in placeholder.find_iter(uri) {
            let range = occurence.range();
            let name = &uri[range.start + 1..range.end - 1];
            if parameters.insert(name.to_string(), index).is_some() {
                return Err(Error::new(format!("Duplicate parameter {} in {}", name, uri)));
            }
            chunks.push(regex::escape(&uri[offset..range.start]));
            chunks.push("([^/]*)".to_string());
            offset = range.end;
            index += 1;
        }
        chunks.push(regex::escape(&uri[offset..]));
        let regex = Regex::new(&format!("^{}$", chunks.join(""))).map_err(|error| Error::new(error.to_string()))?;
        Ok(Self { regex, parameters })
    }

    pub fn check(&self, uri: &str) -> Option<HashMap<String, String>> {
        let captures = self.regex.captures(uri)?;
        let mut parameters = HashMap::new();
        for (name, &index) in &self.parameters {
            parameters.insert(name.clone(), captures[index].to_string());
        }
        Some(parameters)
    }
}

type BoxedResponseFuture = Pin<Box<dyn Send + Future<Output = Response<Body>>>>;
type BoxedHandler<S> = Box<dyn Fn(Request<Body>, HashMap<String, String>, Vec<u8>, Arc<S>) -> BoxedResponseFuture + Send + Sync>;

struct Route<S> {
    method: Method,
    dynamic_uri: DynamicUri,
    handler: BoxedHandler<S>,
}

impl<S> Route<S> {
    fn new(method: Method, uri: &str, handler: BoxedHandler<S>) -> Result<Self, Error> {
        Ok(Self {
            method,
            dynamic_uri: DynamicUri::new(uri)?,
            handler,
        })
    }

    pub fn check(&self, request: &Request<Body>) -> Option<HashMap<String, String>> {
        if request.method() == self.method {
            self.dynamic_uri.check(request.uri().path())
        } else {
            None
        }
    }
}

pub fn respond_text(status: StatusCode, text: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    response
}

pub struct Router<S> {
    routes: Vec<Route<S>>,
    state: Arc<S>,
    logger: Logger,
}

impl<S> Router<S> {
    pub fn new(state: Arc<S>, logger: Logger) -> Self {
        Self {
            routes: Vec::new(),
            state,
            logger,
        }
    }

    pub fn add<H, F>(&mut self, method: Method, uri: &str, handler: H) -> Result<(), Error>
    where
        H: 'static + Fn(Request<Body>, HashMap<String, String>, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.routes.push(Route::new(
            method,
            uri,
            Box::new(move |request, parameters, body, state| Box::pin(handler(request, parameters, body, state))),
        )?);
        Ok(())
    }

    pub async fn route(&self, request: Request<Body>, body: Vec<u8>) -> Response<Body> {
        self.logger.log(format!("{} {}", request.method(), request.uri()));
        for route in &self.routes {
            if let Some(mut parameters) = route.check(&request) {
                if let Some(query) = request.uri().query() {
                    for part in query.split('&') {
                        if let Some((key, value)) = part.split_once('=') {
                            parameters.entry(key.to_string()).or_insert_with(|| value.to_string());
                        }
                    }
                }
                return (route.handler)(request, parameters, body, self.state.clone()).await;
            }
        }
        respond_text(StatusCode::NOT_FOUND, "Not Found")
    }
}

pub struct Server<S> {
    router: Router<S>,
}

impl<S: 'static + Send + Sync> Server<S> {
    pub fn new(state: Arc<S>, logger: Logger) -> Self {
        Self {
            router: Router::new(state, logger),
        }
    }

    pub fn get<H, F>(&mut self, uri: &str, handler: H) -> Result<(), Error>
    where
        H: 'static + Fn(Request<Body>, HashMap<String, String>, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.router.add(Method::GET, uri, handler)
    }

    pub fn post<H, F>(&mut self, uri: &str, handler: H) -> Result<(), Error>
    where
        H: 'static + Fn(Request<Body>, HashMap<String, String>, Vec<u8>, Arc<S>) -> F + Send + Sync,
        F: 'static + Future<Output = Response<Body>> + Send,
    {
        self.router.add(Method::POST, uri, handler)
    }

    pub fn router(&self) -> &Router<S> {
        &self.router
    }

    pub async fn run(self, address: SocketAddr) -> Result<(), Error> {
        let router = Arc::new(self.router);
        let logger = router.logger;
        let make_service = make_service_fn(|_| {
            let router = router.clone();
            async {
                Ok::<_, Infallible>(service_fn(move |mut request: Request<Body>| {
                    let router = router.clone();
                    async move {
                        let mut body: Vec<u8> = Vec::new();
                        while let Some(chunk) = request.body_mut().data().await {
                            match chunk {
                                Ok(chunk) => body.extend_from_slice(&chunk),
                                Err(_) => return Ok::<_, Infallible>(respond_text(StatusCode::BAD_REQUEST, "Unreadable body")),
                            }
                        }
                        Ok(router.route(request, body).await)
                    }
                }))
            }
        });
        let server = hyper::Server::try_bind(&address).map_err(|error| Error::new(error.to_string()).context(address))?;
        logger.log(format!("listening on {}", address));
        server.serve(make_service).await.map_err(|error| Error::new(error.to_string()))
    }
}
