use savesync_lib::ids;
use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::Validator;
use crate::sources::{
    Source,
    CreateSource as CreateSourceBody,
    UpdateSource as UpdateSourceBody,
    BackupStarted,
};

pub struct QuerySources {}

impl QuerySources {
    pub fn new() -> Self {
        QuerySources {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<Vec<Source>, RequestError> {
        let res = client.send(client.get("sources")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RetrieveSource {
    id: ids::SourceId
}

impl RetrieveSource {
    pub fn id(id: ids::SourceId) -> Self {
        RetrieveSource { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Option<Source>, RequestError> {
        let res = client.send(client.get(format!("sources/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK => Ok(Some(payload(res).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct CreateSource {
    body: CreateSourceBody
}

impl CreateSource {
    pub fn new<N, P>(name: N, path: P) -> Self
    where
        N: Into<String>,
        P: Into<String>,
    {
        CreateSource {
            body: CreateSourceBody {
                name: name.into(),
                path: path.into(),
                exclusions: Vec::new(),
                target_id: None,
                schedule_id: None,
            }
        }
    }

    pub fn exclusion<E>(&mut self, glob: E) -> &mut Self
    where
        E: Into<String>
    {
        self.body.exclusions.push(glob.into());
        self
    }

    pub fn target_id(&mut self, target_id: Option<ids::TargetId>) -> &mut Self {
        self.body.target_id = target_id;
        self
    }

    pub fn schedule_id(&mut self, schedule_id: Option<ids::ScheduleId>) -> &mut Self {
        self.body.schedule_id = schedule_id;
        self
    }

    pub async fn send(self, client: &ApiClient) -> Result<Source, RequestError> {
        self.body.validate()?;

        let res = client.send(client.post("sources")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::CREATED => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

impl From<CreateSourceBody> for CreateSource {
    fn from(body: CreateSourceBody) -> Self {
        CreateSource { body }
    }
}

pub struct UpdateSource {
    id: ids::SourceId,
    body: UpdateSourceBody
}

impl UpdateSource {
    pub fn new(id: ids::SourceId, body: UpdateSourceBody) -> Self {
        UpdateSource { id, body }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Source, RequestError> {
        self.body.validate()?;

        let res = client.send(
            client.put(format!("sources/{}", self.id))?.json(&self.body)
        ).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct DeleteSource {
    id: ids::SourceId
}

impl DeleteSource {
    pub fn id(id: ids::SourceId) -> Self {
        DeleteSource { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.send(client.delete(format!("sources/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RunSource {
    id: ids::SourceId
}

impl RunSource {
    pub fn id(id: ids::SourceId) -> Self {
        RunSource { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<BackupStarted, RequestError> {
        let res = client.send(client.post(format!("sources/{}/run", self.id))?).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::ACCEPTED => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}
