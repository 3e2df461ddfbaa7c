use std::sync::Mutex;

use image::{DynamicImage, RgbImage};
use serde_json::json;

use crate::webui::{ImageBackend, Txt2ImgRequest, Txt2ImgResult, WebUiError};

/// In-memory image server that records every txt2img request.
pub(crate) struct MockBackend {
    pub models: Vec<String>,
    pub requests: Mutex<Vec<Txt2ImgRequest>>,
}

impl MockBackend {
    pub fn new(models: &[&str]) -> Self {
        Self { models: models.iter().map(ToString::to_string).collect(), requests: Mutex::new(Vec::new()) }
    }

    pub fn standard() -> Self {
        Self::new(&[
            "control_v11p_sd15_canny [d14c016b]",
            "control_v11p_sd15_seg [e1f51eb9]",
            "control_v11f1p_sd15_depth [cfd03158]",
        ])
    }

    pub fn last_request(&self) -> Txt2ImgRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl ImageBackend for MockBackend {
    async fn controlnet_models(&self) -> Result<Vec<String>, WebUiError> {
        Ok(self.models.clone())
    }

    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResult, WebUiError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Txt2ImgResult {
            image: DynamicImage::ImageRgb8(RgbImage::new(request.width, request.height)),
            info: json!({ "seed": 42, "infotexts": [format!("{}\nSteps: {}", request.prompt, request.steps)] }),
        })
    }
}
