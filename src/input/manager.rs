//! Input manager for loading resumes and job descriptions from disk

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor;
use crate::processing::document::{DocumentExtractor, StructuredResume};
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    extractor: DocumentExtractor,
    cache: HashMap<String, StructuredResume>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new(extractor: DocumentExtractor) -> Self {
        Self {
            extractor,
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a resume file and structure it, using the extension as format hint
    pub async fn load_resume(&mut self, path: &Path) -> Result<StructuredResume> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached resume for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        let format = DocumentFormat::from_path(path)?;
        let bytes = self.read_bytes(path).await?;

        info!("Extracting {} resume: {}", format, path.display());
        let resume = self.extractor.extract_as(&bytes, format)?;

        if self.enable_cache {
            self.cache.insert(path_str, resume.clone());
        }

        Ok(resume)
    }

    /// Read a job description as flat text (txt, md, pdf or docx)
    pub async fn load_text(&self, path: &Path) -> Result<String> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = self.read_bytes(path).await?;

        info!("Reading {} job description: {}", format, path.display());
        text_extractor::extract_text(&bytes, format)
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(ResumeTailorError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }
        Ok(fs::read(path).await?)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
