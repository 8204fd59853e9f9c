use crate::{
    base_common,
    repack::{BitWidth, Decoder, Encoder, Mode, BASE64_ALPHABET},
    Arc, Error, HashMap, Logger, Server,
};
use hyper::{header::CONTENT_TYPE, header::HeaderValue, Body, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

macro_rules! unwrap {
    ( $x:expr ) => {{
        match $x {
            Ok(result) => result,
            Err(error) => return respond_error(error),
        }
    }};
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub encoded: usize,
    pub decoded: usize,
    pub failed: usize,
}

/// Shared state of the codec service: defaults for requests that leave them out, and counters.
pub struct Service {
    width: BitWidth,
    mode: Mode,
    stats: Mutex<Stats>,
}

#[derive(Debug, Deserialize)]
pub struct EncodeRequest {
    pub width: Option<usize>,
    pub symbols: Option<Vec<u32>>,
    pub text: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EncodeResponse {
    pub width: usize,
    pub encoded: String,
}

#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub width: Option<usize>,
    pub encoded: String,
    pub tolerant: Option<bool>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DecodeResponse {
    pub width: usize,
    pub symbols: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|error| Error::new(format!("Invalid JSON body ({})", error)))
}

impl Service {
    pub fn new(width: BitWidth, mode: Mode) -> Self {
        Self {
            width,
            mode,
            stats: Mutex::new(Stats::default()),
        }
    }

    /// Width from the body, else from the `width` query parameter, else the service default.
    fn width(&self, width: Option<usize>, parameters: &HashMap<String, String>) -> Result<BitWidth, Error> {
        let bits = match (width, parameters.get("width")) {
            (Some(bits), _) => bits,
            (None, Some(bits)) => bits
                .parse()
                .map_err(|_| Error::new(format!(r#"Invalid width parameter "{}""#, bits)))?,
            (None, None) => return Ok(self.width),
        };
        Ok(BitWidth::new(bits)?)
    }

    pub fn encode(&self, request: EncodeRequest, parameters: &HashMap<String, String>) -> Result<EncodeResponse, Error> {
        let width = self.width(request.width, parameters)?;
        let symbols: Vec<u32> = match (request.symbols, request.text) {
            (Some(symbols), None) => symbols,
            (None, Some(text)) => match width.bits() {
                8 => text.bytes().map(u32::from).collect(),
                16 => text.encode_utf16().map(u32::from).collect(),
                bits => return Err(Error::new(format!("Text needs a width of 8 or 16 bits, not {}", bits))),
            },
            _ => return Err(Error::new("Expecting one of symbols or text")),
        };
        let encoded = Encoder::new(&BASE64_ALPHABET, width).encode(&symbols[..])?;
        Ok(EncodeResponse {
            width: width.bits(),
            encoded,
        })
    }

    pub fn decode(&self, request: DecodeRequest, parameters: &HashMap<String, String>) -> Result<DecodeResponse, Error> {
        let width = self.width(request.width, parameters)?;
        let mode = match request.tolerant {
            Some(true) => Mode::Tolerant,
            Some(false) => Mode::Strict,
            None => self.mode,
        };
        let symbols: Vec<u32> = Decoder::new(&BASE64_ALPHABET, width).with_mode(mode).decode(&request.encoded)?;
        let text = match width.bits() {
            8 => String::from_utf8(symbols.iter().map(|&symbol| symbol as u8).collect()).ok(),
            16 => String::from_utf16(&symbols.iter().map(|&symbol| symbol as u16).collect::<Vec<_>>()).ok(),
            _ => None,
        };
        Ok(DecodeResponse {
            width: width.bits(),
            symbols,
            text,
        })
    }

    async fn count<T>(&self, result: &Result<T, Error>, f: impl FnOnce(&mut Stats)) {
        let mut stats = self.stats.lock().await;
        match result {
            Ok(_) => f(&mut stats),
            Err(_) => stats.failed += 1,
        }
    }

    pub async fn stats(&self) -> Stats {
        *self.stats.lock().await
    }
}

fn respond(status: StatusCode, value: serde_json::Value) -> Response<Body> {
    let mut response = Response::new(Body::from(value.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn respond_ok(value: impl Serialize) -> Response<Body> {
    match serde_json::to_value(value) {
        Ok(value) => respond(StatusCode::OK, value),
        Err(error) => respond(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": error.to_string()})),
    }
}

fn respond_error(error: Error) -> Response<Body> {
    respond(StatusCode::BAD_REQUEST, json!({"message": error.to_string()}))
}

fn parse_value(parameters: &HashMap<String, String>) -> Result<usize, Error> {
    let value = parameters.get("value").map(String::as_str).unwrap_or_default();
    match value.parse::<usize>() {
        Ok(value) if value < BASE64_ALPHABET.len() => Ok(value),
        _ => Err(Error::new(format!(r#"Invalid value "{}", expecting 0 to 63"#, value))),
    }
}

pub fn create_server(service: Arc<Service>, logger: Logger) -> Result<Server<Service>, Error> {
    let mut server = Server::new(service, logger);

    server.get("/alphabet", |_request, _parameters, _body, _service| async move {
        respond_ok(json!({
            "alphabet": base_common::encode_table().iter().collect::<String>(),
            "padding": char::from(base_common::PADDING),
        }))
    })?;

    server.get("/alphabet/{value}", |_request, parameters, _body, _service| async move {
        let value = unwrap!(parse_value(&parameters));
        respond_ok(json!({"value": value, "character": char::from(BASE64_ALPHABET.encode(value))}))
    })?;

    server.post("/encode", |_request, parameters, body, service: Arc<Service>| async move {
        let request = unwrap!(parse_body::<EncodeRequest>(&body));
        let result = service.encode(request, &parameters);
        service.count(&result, |stats| stats.encoded += 1).await;
        respond_ok(unwrap!(result))
    })?;

    server.post("/decode", |_request, parameters, body, service: Arc<Service>| async move {
        let request = unwrap!(parse_body::<DecodeRequest>(&body));
        let result = service.decode(request, &parameters);
        service.count(&result, |stats| stats.decoded += 1).await;
        respond_ok(unwrap!(result))
    })?;

    server.get("/stats", |_request, _parameters, _body, service: Arc<Service>| async move {
        respond_ok(service.stats().await)
    })?;

    Ok(server)
}
