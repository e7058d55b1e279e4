use serde::Serialize;

/// 업로드 결과. 이미지 레코드(`images`)는 `ref_id`(회원 또는 게시글 ID)와 URL만 가집니다.
#[derive(Debug, Serialize)]
pub struct ImageUrlResponse {
    pub url: String,
}
