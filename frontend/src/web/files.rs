//! Reads picked files into memory.

use medscore::request::DocumentFile;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlInputElement};

/// First file of an `<input type="file">` change event.
///
/// `Ok(None)` means the user cleared the picker.
pub async fn read_picked_file(ev: Event) -> Result<Option<DocumentFile>, String> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return Err("event target is not a file input".to_string());
    };
    let Some(file) = input.files().and_then(|list| list.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("reading {} failed: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(Some(DocumentFile::new(file.name(), file.type_(), bytes)))
}
