use anyhow::{anyhow, Context};
use image::RgbaImage;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wall_core::relief::decode_rgba;
use wall_core::{ReliefSource, WallError};
use web_sys as web;

/// GET `url` and return the body bytes.
pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {url}: {e:?}"))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| anyhow!("fetch {url}: not a response: {e:?}"))?;
    if !resp.ok() {
        return Err(anyhow!("fetch {url}: HTTP {}", resp.status()));
    }
    let buf = resp
        .array_buffer()
        .map_err(|e| anyhow!("{e:?}"))
        .with_context(|| format!("reading {url}"))?;
    let buf = JsFuture::from(buf)
        .await
        .map_err(|e| anyhow!("reading {url}: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Fetch failures surface as an empty asset so the scene degrades the same way for both.
async fn fetch_or_empty(url: &str) -> Vec<u8> {
    match fetch_bytes(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("{e:#}");
            Vec::new()
        }
    }
}

pub async fn load_relief(url: &str) -> Result<ReliefSource, WallError> {
    ReliefSource::decode(&fetch_or_empty(url).await)
}

pub async fn load_plane_image(url: &str) -> Result<RgbaImage, WallError> {
    decode_rgba(&fetch_or_empty(url).await)
}

/// Split a `data-images` attribute into trimmed, non-empty urls.
pub fn parse_image_list(attr: &str) -> Vec<String> {
    attr.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
