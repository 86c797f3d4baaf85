//! WASM bindings for the browser PDF summarization flow.
//!
//! The browser never holds the upstream credential: summaries are requested
//! from a pdfsum server, which extracts and summarizes on its side.

use js_sys::{Function, Promise, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{File, Request, RequestInit, Response};

use pdfsum_core::models::config::ExportConfig;
use pdfsum_core::validate::is_pdf_content_type;
use pdfsum_core::{
    InputError, ProgressEvent, ServerSummary, SummarizeRequest, Upload, ValidationOptions,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Check a declared MIME type before the file is read.
fn check_declared_type(name: &str, content_type: &str) -> Result<(), InputError> {
    if is_pdf_content_type(content_type) {
        Ok(())
    } else {
        Err(InputError::NotPdf {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
        })
    }
}

/// Reject a selected file unless its type is `application/pdf`.
#[wasm_bindgen]
pub fn validate_upload(name: &str, content_type: &str) -> Result<(), JsValue> {
    check_declared_type(name, content_type).map_err(js_error)
}

/// Download name for the workbook of `name`.
#[wasm_bindgen]
pub fn export_file_name(name: &str) -> String {
    pdfsum_core::export_file_name(name)
}

/// A summary the server produced for one file.
///
/// Returned only by [`SummaryClient::summarize`], so the workbook can only be
/// built after a successful request.
#[wasm_bindgen]
pub struct SummaryResult {
    reply: ServerSummary,
}

#[wasm_bindgen]
impl SummaryResult {
    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> String {
        self.reply.summary().to_string()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.reply.file_name().to_string()
    }

    /// Download name for the workbook.
    #[wasm_bindgen(getter, js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        pdfsum_core::export_file_name(self.reply.file_name())
    }

    /// Build the summary workbook and return its bytes.
    #[wasm_bindgen(js_name = exportWorkbook)]
    pub fn export_workbook(&self) -> Result<Uint8Array, JsValue> {
        let artifact = self
            .reply
            .export(&ExportConfig::default())
            .map_err(js_error)?;
        Ok(Uint8Array::from(artifact.bytes.as_slice()))
    }
}

/// Summarizes browser files through a pdfsum server.
#[wasm_bindgen]
pub struct SummaryClient {
    url: String,
    require_signature: bool,
}

#[wasm_bindgen]
impl SummaryClient {
    /// Create a client for the server at `endpoint` (empty for same origin).
    #[wasm_bindgen(constructor)]
    pub fn new(endpoint: &str) -> Self {
        Self {
            url: summarize_url(endpoint),
            require_signature: ValidationOptions::default().require_signature,
        }
    }

    /// URL the client posts to.
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Toggle the `%PDF-` signature check on file contents.
    #[wasm_bindgen]
    pub fn set_require_signature(&mut self, require: bool) {
        self.require_signature = require;
    }

    /// Summarize `file`, reporting progress strings to `on_progress`.
    ///
    /// Resolves to a [`SummaryResult`], or rejects with an error message.
    #[wasm_bindgen]
    pub fn summarize(&self, file: File, on_progress: Option<Function>) -> Promise {
        let url = self.url.clone();
        let options = ValidationOptions {
            require_signature: self.require_signature,
        };

        future_to_promise(async move {
            let reply = summarize_file(&url, options, file, on_progress.as_ref()).await?;
            Ok(SummaryResult { reply }.into())
        })
    }
}

fn summarize_url(endpoint: &str) -> String {
    format!("{}/api/summarize", endpoint.trim().trim_end_matches('/'))
}

fn report(on_progress: Option<&Function>, event: &ProgressEvent) {
    if let Some(callback) = on_progress {
        // A throwing callback must not abort the request.
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&event.to_string())) {
            web_sys::console::warn_2(&JsValue::from_str("progress callback failed:"), &e);
        }
    }
}

async fn summarize_file(
    url: &str,
    options: ValidationOptions,
    file: File,
    on_progress: Option<&Function>,
) -> Result<ServerSummary, JsValue> {
    let name = file.name();
    check_declared_type(&name, &file.type_()).map_err(js_error)?;

    report(on_progress, &ProgressEvent::Loading);
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let upload = Upload::new(name, Some(file.type_()), Uint8Array::new(&buffer).to_vec());
    pdfsum_core::validate_upload(&upload, &options).map_err(js_error)?;

    // Truncation happens on the server
    report(on_progress, &ProgressEvent::Summarizing { chars: None });
    let reply = post_summary(url, &upload).await?;

    report(on_progress, &ProgressEvent::Done);
    Ok(reply)
}

async fn post_summary(url: &str, upload: &Upload) -> Result<ServerSummary, JsValue> {
    let body = serde_json::to_string(&SummarizeRequest::from_bytes(&upload.bytes, &upload.file_name))
        .map_err(js_error)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;

    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    ServerSummary::from_reply(&upload.file_name, response.status(), text.as_bytes())
        .map_err(js_error)
}
