//! Azure AI Language question answering client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use polyfaq_core::{Answer, Error, KnowledgeBase, Result};

use crate::config::AzureConfig;
use crate::http::{self, SUBSCRIPTION_KEY_HEADER};

const SERVICE: &str = "question answering";
const API_VERSION: &str = "2021-10-01";

/// Knowledge base client bound to one project and deployment
pub struct QuestionAnsweringClient {
    endpoint: Url,
    key: String,
    project_name: String,
    deployment_name: String,
    top: u32,
    confidence_threshold: Option<f32>,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRequest<'a> {
    question: &'a str,
    top: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_score_threshold: Option<f32>,
}

#[derive(Deserialize)]
struct QueryResponse {
    answers: Vec<KnowledgeBaseAnswer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeBaseAnswer {
    answer: String,
    #[serde(default)]
    confidence_score: f32,
    #[serde(default)]
    source: Option<String>,
}

impl QuestionAnsweringClient {
    pub fn new(config: &AzureConfig) -> Result<Self> {
        let client = http::build_client(config.request_timeout)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &AzureConfig, client: Client) -> Self {
        Self {
            endpoint: config.qna_endpoint.clone(),
            key: config.qna_key.clone(),
            project_name: config.project_name.clone(),
            deployment_name: config.deployment_name.clone(),
            top: config.top,
            confidence_threshold: config.confidence_threshold,
            client,
        }
    }

    /// `POST {endpoint}/language/:query-knowledgebases?projectName=..&deploymentName=..&api-version=..`
    pub fn query_url(&self) -> Result<Url> {
        let mut url = self
            .endpoint
            .join("language/:query-knowledgebases")
            .map_err(|e| Error::Configuration(format!("invalid question answering route: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("projectName", &self.project_name)
            .append_pair("deploymentName", &self.deployment_name)
            .append_pair("api-version", API_VERSION);
        Ok(url)
    }

    pub(crate) fn request_body<'a>(&self, question: &'a str) -> QueryRequest<'a> {
        QueryRequest {
            question,
            top: self.top,
            confidence_score_threshold: self.confidence_threshold,
        }
    }
}

#[async_trait]
impl KnowledgeBase for QuestionAnsweringClient {
    async fn answers(&self, question: &str) -> Result<Vec<Answer>> {
        if question.trim().is_empty() {
            return Err(Error::InvalidInput("question is empty".to_string()));
        }

        let url = self.query_url()?;
        debug!(%url, project = %self.project_name, "querying knowledge base");

        let request = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key);

        let body = http::send_json(SERVICE, request, &self.request_body(question)).await?;
        parse_answers_response(&body)
    }
}

/// Decode the ranked answers of a knowledge base query
pub fn parse_answers_response(body: &str) -> Result<Vec<Answer>> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| Error::UnexpectedResponse(format!("knowledge base response: {}", e)))?;

    Ok(response
        .answers
        .into_iter()
        .map(|a| Answer {
            text: a.answer,
            confidence: a.confidence_score,
            source: a.source,
        })
        .collect())
}
