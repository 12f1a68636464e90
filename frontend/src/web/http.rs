//! Browser `HttpClient`
//!
//! Sends core `HttpRequest`s through `fetch` (gloo-net). Multipart bodies
//! become a `FormData` of `Blob`s so the browser writes the boundary.

use gloo_net::http::{Request, RequestBuilder};
use medscore::ClientError;
use medscore::error::ClientResult;
use medscore::request::{HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartField};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

fn js_error(context: &str, err: JsValue) -> ClientError {
    ClientError::network(format!("{}: {:?}", context, err))
}

fn form_data(fields: &[MultipartField]) -> ClientResult<FormData> {
    let form = FormData::new().map_err(|e| js_error("FormData", e))?;
    for field in fields {
        let bytes = js_sys::Uint8Array::from(field.file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(&field.file.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| js_error("Blob", e))?;
        form.append_with_blob_and_filename(&field.name, &blob, &field.file.name)
            .map_err(|e| js_error("FormData append", e))?;
    }
    Ok(form)
}

fn build(req: HttpRequest) -> ClientResult<Request> {
    let mut builder: RequestBuilder = match req.method {
        HttpMethod::Get => Request::get(&req.url),
        HttpMethod::Post => Request::post(&req.url),
    };
    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }

    let request = match req.body {
        HttpBody::Empty => builder.build(),
        HttpBody::Json(body) => builder.body(body),
        HttpBody::Multipart(fields) => builder.body(form_data(&fields)?),
    };
    request.map_err(|e| ClientError::network(format!("request build failed: {}", e)))
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let resp = build(req)?
            .send()
            .await
            .map_err(|e| ClientError::network(format!("fetch failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::network(format!("reading body failed: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
