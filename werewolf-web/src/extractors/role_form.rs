use axum::extract::{FromRequest, Multipart, Request};
use werewolf_domain::{RoleInput, Team};
use werewolf_service::ImageUpload;
use crate::error::ApiError;

/// 角色表单（multipart）：name、description、team、score，以及可选的image文件
pub struct RoleForm {
    pub input: RoleInput,
    pub image: Option<ImageUpload>,
}

#[async_trait::async_trait]
impl<S> FromRequest<S> for RoleForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut name = None;
        let mut description = None;
        let mut team = None;
        let mut score = None;
        let mut image = None;

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "image" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // 浏览器在未选择文件时也会提交一个空的文件字段
                    if !bytes.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty()) {
                        image = Some(ImageUpload::new(bytes, file_name, content_type));
                    }
                }
                "name" => name = Some(field.text().await?),
                "description" => description = Some(field.text().await?),
                "team" => team = Some(field.text().await?),
                "score" => score = Some(field.text().await?),
                _ => {}
            }
        }

        let team = team
            .as_deref()
            .unwrap_or_default()
            .parse::<Team>()
            .map_err(ApiError::BadRequest)?;
        let score = score
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .parse::<i32>()
            .map_err(|_| ApiError::BadRequest("Score must be an integer".to_string()))?;

        Ok(Self {
            input: RoleInput {
                name: name.unwrap_or_default().trim().to_string(),
                description: description.filter(|d| !d.trim().is_empty()),
                team,
                score,
            },
            image,
        })
    }
}
