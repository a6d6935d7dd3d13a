use crate::config::ClientConfig;
use crate::report::AnalysisReport;
use crate::selection::SelectedFile;
use crate::service::{interpret_analyze, interpret_demo, AnalysisService, ServiceError};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use url::Url;

#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    analyze_url: Url,
    demo_url: Url,
}

impl HttpAnalysisService {
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            analyze_url: config.origin.analyze_url()?,
            demo_url: config.origin.demo_url()?,
        })
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }

    pub fn demo_url(&self) -> &Url {
        &self.demo_url
    }
}

fn file_part(file: &SelectedFile) -> Part {
    let part = || {
        Part::stream_with_length(Body::from(file.bytes.clone()), file.bytes.len() as u64)
            .file_name(file.name.clone())
    };
    // An unparseable declared type is sent without a part content type.
    part().mime_str(&file.media_type).unwrap_or_else(|_| part())
}

async fn read_body(response: Response) -> Result<(u16, Vec<u8>), ServiceError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| ServiceError::Transport(e.to_string()))?;
    Ok((status, body.to_vec()))
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, file: SelectedFile) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>> {
        let this = self.clone();
        async move {
            tracing::info!(
                url = %this.analyze_url,
                file = %file.name,
                media_type = %file.media_type,
                size = file.bytes.len(),
                "uploading for analysis"
            );
            let form = Form::new().part("file", file_part(&file));

            let response = this
                .client
                .post(this.analyze_url.clone())
                .multipart(form)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "analyze request failed");
                    ServiceError::Transport(e.to_string())
                })?;

            let (status, body) = read_body(response).await?;
            tracing::debug!(status, bytes = body.len(), "analyze response");
            interpret_analyze(status, &body)
        }
        .boxed()
    }

    fn demo(&self) -> BoxFuture<'_, Result<AnalysisReport, ServiceError>> {
        let this = self.clone();
        async move {
            tracing::info!(url = %this.demo_url, "requesting demo analysis");
            let response = this
                .client
                .get(this.demo_url.clone())
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "demo request failed");
                    ServiceError::Transport(e.to_string())
                })?;

            let (status, body) = read_body(response).await?;
            tracing::debug!(status, bytes = body.len(), "demo response");
            interpret_demo(status, &body)
        }
        .boxed()
    }
}
