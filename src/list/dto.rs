use serde::{Deserialize, Serialize};

use crate::list::repo::ListedAnime;

/// JSON body for POST /api/add_anime. Only `id_anime` and `status` are
/// required; the handler substitutes defaults for the metadata fields.
#[derive(Debug, Deserialize)]
pub struct AddAnimeRequest {
    #[serde(rename = "id_anime", default)]
    pub anime_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "titulo_anime", default)]
    pub title: Option<String>,
    #[serde(rename = "genero", default)]
    pub genre: Option<String>,
    #[serde(rename = "ano", default)]
    pub year: Option<i64>,
    #[serde(rename = "plataforma", default)]
    pub platform: Option<String>,
    #[serde(rename = "sinopse", default)]
    pub synopsis: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub animes: Vec<ListedAnime>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_reads_wire_field_names() {
        let body = r#"{"id_anime": 42, "status": "assistindo", "notas": "ep 3",
                       "titulo_anime": "Cowboy Bebop", "ano": 1998}"#;
        let req: AddAnimeRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.anime_id, Some(42));
        assert_eq!(req.status.as_deref(), Some("assistindo"));
        assert_eq!(req.notes.as_deref(), Some("ep 3"));
        assert_eq!(req.title.as_deref(), Some("Cowboy Bebop"));
        assert_eq!(req.year, Some(1998));
        assert!(req.genre.is_none());
    }

    #[test]
    fn list_response_serializes_wire_field_names() {
        let response = ListResponse {
            success: true,
            animes: vec![ListedAnime {
                anime_id: 42,
                title: "Cowboy Bebop".into(),
                genre: "Sci-Fi".into(),
                year: 1998,
                platform: "Netflix".into(),
                synopsis: String::new(),
                status: "completed".into(),
                notes: "great".into(),
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"id_anime\":42"));
        assert!(json.contains("\"titulo\":\"Cowboy Bebop\""));
        assert!(json.contains("\"notas\":\"great\""));
        assert!(!json.contains("anime_id\":42,\"title"));
    }
}
