use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Request, Response};
use http_body_util::Full;
use micro_negotiate::{
    encode_error, response_content_type, select_decoder, select_encoder, HandledError, ResponseBody, ServiceError,
    TracingLogger,
};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Deserialize, Serialize)]
struct Account {
    id: u64,
    name: String,
}

async fn create_account(request: Request<Full<Bytes>>) -> Response<ResponseBody> {
    let (parts, body) = request.into_parts();

    let account: Account = match select_decoder(&parts.headers, body).decode().await {
        Ok(account) => account,
        Err(e) => return encode_error(&parts, &TracingLogger, e.into()),
    };

    if account.name.is_empty() {
        return encode_error(&parts, &TracingLogger, ServiceError::unprocessable("name must not be empty").into());
    }
    if account.id == 0 {
        return encode_error(&parts, &TracingLogger, HandledError::unexpected("account sequence exhausted"));
    }

    let mut encoder = select_encoder(&parts.headers);
    if let Err(e) = encoder.encode(&account) {
        return encode_error(&parts, &TracingLogger, HandledError::unexpected(e));
    }

    let mut response = Response::new(encoder.into_body());
    response.headers_mut().insert(CONTENT_TYPE, http::HeaderValue::from_static(response_content_type(&parts.headers)));
    response
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let requests = [
        ("application/json", "application/xml", r#"{"id":1,"name":"zava"}"#),
        ("application/json; charset=utf-8", "application/json", r#"{"id":2,"name":""}"#),
        ("text/plain", "*/*", r#"{"id":0,"name":"zava"}"#),
        ("application/json", "application/json", r#"{"id":"#),
    ];

    for (content_type, accept, body) in requests {
        let request = Request::builder()
            .method("POST")
            .uri("/accounts")
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, accept)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .expect("valid request");

        let response = create_account(request).await;
        info!(
            status = %response.status(),
            content_type = ?response.headers().get(CONTENT_TYPE),
            body = %String::from_utf8_lossy(response.body().as_bytes()),
            "response"
        );
    }
}
