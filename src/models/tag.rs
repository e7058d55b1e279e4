use serde::Serialize;

/// 태그 엔티티. DB의 `tags` 테이블 한 행(row)에 대응합니다.
/// 이름은 전역에서 유일합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// 게시글별 태그 조회 결과 (`post_tags` JOIN `tags`)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostTag {
    pub post_id: String,
    pub id: String,
    pub name: String,
}
