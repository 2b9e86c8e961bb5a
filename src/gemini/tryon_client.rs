use super::{prompts, ContentGenerator};
use crate::{
    data_url::DataUrl,
    error::{Result, TryOnError},
    logger,
    models::{GenerateContentRequest, GenerateContentResponse, Part, FINISH_REASON_STOP},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// An image handed to the service: a file on disk or an in-memory data URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    File(PathBuf),
    DataUrl(DataUrl),
}

impl ImageInput {
    pub async fn to_data_url(&self) -> Result<DataUrl> {
        match self {
            ImageInput::File(path) => DataUrl::from_file(path).await,
            ImageInput::DataUrl(url) => Ok(url.clone()),
        }
    }

    async fn to_part(&self) -> Result<Part> {
        let url = self.to_data_url().await?;
        Part::from_data_url(&url)
    }
}

impl From<DataUrl> for ImageInput {
    fn from(url: DataUrl) -> Self {
        ImageInput::DataUrl(url)
    }
}

impl From<&DataUrl> for ImageInput {
    fn from(url: &DataUrl) -> Self {
        ImageInput::DataUrl(url.clone())
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        ImageInput::File(path)
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        ImageInput::File(path.to_path_buf())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyAdjustment {
    More,
    Less,
}

impl fmt::Display for BodyAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyAdjustment::More => write!(f, "more"),
            BodyAdjustment::Less => write!(f, "less"),
        }
    }
}

impl FromStr for BodyAdjustment {
    type Err = TryOnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "more" => Ok(BodyAdjustment::More),
            "less" => Ok(BodyAdjustment::Less),
            other => Err(TryOnError::InvalidArgument(format!(
                "adjustment direction must be 'more' or 'less', got '{}'",
                other
            ))),
        }
    }
}

/// The generation service: four prompt templates over one request pattern.
#[derive(Clone)]
pub struct TryOnClient<G> {
    generator: G,
    model: String,
}

impl<G: ContentGenerator> TryOnClient<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            model: String::new(),
        }
    }

    /// Overrides the model the generator would pick by default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn generate_model_image(&self, photo: impl Into<ImageInput>) -> Result<DataUrl> {
        let _timer = logger::timer("generate_model_image");
        let parts = vec![
            photo.into().to_part().await?,
            Part::text(prompts::MODEL_IMAGE_PROMPT),
        ];
        self.run(parts).await
    }

    pub async fn generate_virtual_try_on_image(
        &self,
        model_image: impl Into<ImageInput>,
        garment: impl Into<ImageInput>,
    ) -> Result<DataUrl> {
        let _timer = logger::timer("generate_virtual_try_on_image");
        let parts = vec![
            model_image.into().to_part().await?,
            garment.into().to_part().await?,
            Part::text(prompts::VIRTUAL_TRY_ON_PROMPT),
        ];
        self.run(parts).await
    }

    pub async fn generate_pose_variation(
        &self,
        model_image: impl Into<ImageInput>,
        pose: &str,
    ) -> Result<DataUrl> {
        if pose.trim().is_empty() {
            return Err(TryOnError::InvalidArgument(
                "pose instruction must not be empty".into(),
            ));
        }
        let _timer = logger::timer("generate_pose_variation");
        let parts = vec![
            model_image.into().to_part().await?,
            Part::text(prompts::pose_variation_prompt(pose)),
        ];
        self.run(parts).await
    }

    pub async fn adjust_body_shape(
        &self,
        model_image: impl Into<ImageInput>,
        direction: BodyAdjustment,
    ) -> Result<DataUrl> {
        let _timer = logger::timer("adjust_body_shape");
        let parts = vec![
            model_image.into().to_part().await?,
            Part::text(prompts::body_adjustment_prompt(direction)),
        ];
        self.run(parts).await
    }

    async fn run(&self, parts: Vec<Part>) -> Result<DataUrl> {
        let request = GenerateContentRequest::new(self.model.clone(), parts);
        let response = self.generator.generate_content(&request).await?;
        extract_image(&response)
    }
}

/// Pulls exactly one image out of a response or explains why there is none.
pub fn extract_image(response: &GenerateContentResponse) -> Result<DataUrl> {
    if let Some(reason) = response.block_reason() {
        let message = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason_message.clone());
        log::warn!("Request blocked: {}", reason);
        return Err(TryOnError::BlockedContent {
            reason: reason.to_string(),
            message,
        });
    }

    if let Some(inline) = response.first_image() {
        let mime_type = if inline.mime_type.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            inline.mime_type.as_str()
        };
        let url = format!("data:{};base64,{}", mime_type, inline.data);
        return DataUrl::parse(&url).map_err(|e| {
            TryOnError::ResponseError(format!("model returned an unreadable image: {}", e))
        });
    }

    if let Some(reason) = response.finish_reason() {
        if reason != FINISH_REASON_STOP {
            log::warn!("Generation stopped with finish reason {}", reason);
            return Err(TryOnError::GenerationInterrupted(reason.to_string()));
        }
    }

    let detail = match response.text() {
        Some(text) => format!("The model responded with text: \"{}\"", text),
        None => "This can happen due to safety filters or if the request is too complex. Please try a different image.".to_string(),
    };
    Err(TryOnError::NoImageReturned(detail))
}
