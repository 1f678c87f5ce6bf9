//! Session service adapter over browser `fetch()` via gloo-net.
//!
//! Every exchange (send + body read) runs under a gloo-timers deadline.
//! Non-2xx statuses, timeouts and undecodable bodies all come back as
//! `ClientError::Transport`.

use std::future::Future;

use async_trait::async_trait;
use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use docchat_core::ports::{ChatReply, SessionApiPort};
use docchat_types::{
    ClientError, Result,
    config::ClientConfig,
    document::{UploadFile, UploadReceipt},
    message::Message,
    session::Session,
};

use super::wire::{self, ChatBody, CreateSessionBody, WireChatReply, WireHealth, WireSession, WireUpload};
use super::Endpoints;

pub struct HttpSessionApi {
    endpoints: Endpoints,
    request_timeout_ms: u64,
    upload_timeout_ms: u64,
}

impl HttpSessionApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoints: Endpoints::new(&config.api_base),
            request_timeout_ms: config.request_timeout_ms,
            upload_timeout_ms: config.upload_timeout_ms,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send `request` and return the body of a 2xx response.
    async fn execute(&self, label: &str, request: Request, timeout_ms: u64) -> Result<String> {
        log::debug!("{}", label);

        let exchange = async move {
            let response = request.send().await.map_err(transport)?;
            let ok = response.ok();
            let status = response.status();
            let body = response.text().await.map_err(transport)?;
            Ok::<_, ClientError>((ok, status, body))
        };
        let (ok, status, body) = with_timeout(exchange, timeout_ms).await??;

        if !ok {
            let detail = wire::error_detail(&body);
            log::warn!("{} failed with HTTP {}: {}", label, status, detail);
            return Err(ClientError::http_status(status, &detail));
        }
        Ok(body)
    }
}

#[async_trait(?Send)]
impl SessionApiPort for HttpSessionApi {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = self.endpoints.sessions();
        let request = Request::get(&url).build().map_err(transport)?;
        let body = self
            .execute("GET /sessions", request, self.request_timeout_ms)
            .await?;
        wire::decode_sessions(&body)
    }

    async fn create_session(&self, title: &str) -> Result<Session> {
        let url = self.endpoints.sessions();
        let request = Request::post(&url)
            .json(&CreateSessionBody { title })
            .map_err(transport)?;
        let body = self
            .execute("POST /sessions", request, self.request_timeout_ms)
            .await?;
        let created: WireSession = wire::decode(&body)?;
        Ok(created.into_session())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoints.session(session_id);
        let request = Request::delete(&url).build().map_err(transport)?;
        self.execute(
            &format!("DELETE /sessions/{}", session_id),
            request,
            self.request_timeout_ms,
        )
        .await?;
        Ok(())
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoints.messages(session_id);
        let request = Request::get(&url).build().map_err(transport)?;
        let body = self
            .execute(
                &format!("GET /sessions/{}/messages", session_id),
                request,
                self.request_timeout_ms,
            )
            .await?;
        wire::decode_messages(&body)
    }

    async fn send_chat(&self, session_id: &str, question: &str) -> Result<ChatReply> {
        let url = self.endpoints.chat(session_id);
        let request = Request::post(&url)
            .json(&ChatBody { question })
            .map_err(transport)?;
        // The answer is generated before the response, so this is slow too.
        let body = self
            .execute(
                &format!("POST /sessions/{}/chat", session_id),
                request,
                self.upload_timeout_ms,
            )
            .await?;
        let reply: WireChatReply = wire::decode(&body)?;
        Ok(ChatReply { answer: reply.answer })
    }

    async fn upload_document(&self, session_id: &str, file: &UploadFile) -> Result<UploadReceipt> {
        let url = self.endpoints.upload(session_id);
        let form = multipart(file)?;
        // No Content-Type header: the browser adds the multipart boundary.
        let request = Request::post(&url).body(form).map_err(transport)?;
        let body = self
            .execute(
                &format!("POST /sessions/{}/upload", session_id),
                request,
                self.upload_timeout_ms,
            )
            .await?;
        let upload: WireUpload = wire::decode(&body)?;
        if let Some(message) = &upload.message {
            log::info!("{}", message);
        }
        Ok(upload.into_receipt(session_id))
    }

    async fn health(&self) -> Result<()> {
        let url = self.endpoints.health();
        let request = Request::get(&url).build().map_err(transport)?;
        let body = self
            .execute("GET /health", request, self.request_timeout_ms)
            .await?;
        let health: WireHealth = wire::decode(&body)?;
        if health.status != "ok" {
            return Err(ClientError::Transport(format!(
                "service reports status {:?}",
                health.status
            )));
        }
        Ok(())
    }

    fn api_base(&self) -> &str {
        self.endpoints.base()
    }
}

// ─── Helpers ─────────────────────────────────────────────────

async fn with_timeout<T>(fut: impl Future<Output = T>, timeout_ms: u64) -> Result<T> {
    let timeout = TimeoutFuture::new(u32::try_from(timeout_ms).unwrap_or(u32::MAX));
    pin_mut!(fut);
    match select(fut, timeout).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right(_) => Err(ClientError::timeout(timeout_ms)),
    }
}

/// Single `file` field carrying the raw bytes.
fn multipart(file: &UploadFile) -> Result<FormData> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    let media_type = file
        .media_type
        .clone()
        .or_else(|| file.declared_kind().map(|k| k.media_type().to_string()));
    if let Some(media_type) = media_type {
        options.set_type(&media_type);
    }

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &blob, &file.file_name)
        .map_err(js_error)?;
    Ok(form)
}

fn transport(e: gloo_net::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

fn js_error(e: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", e))
}
