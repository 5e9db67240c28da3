use serde::{Deserialize, Serialize};

/// Form body for POST /cadastro. Fields are optional so presence checks
/// happen in the handler (missing fields redirect instead of 422).
#[derive(Debug, Deserialize)]
pub struct CadastroForm {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
}

/// Form body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "senha", default)]
    pub password: Option<String>,
}

/// JSON body for POST /api/perfil/atualizar.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "novo_nome")]
    pub new_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_response_uses_wire_field_names() {
        let response = ProfileUpdatedResponse {
            success: true,
            message: "Perfil atualizado com sucesso.".into(),
            new_name: "Ana Clara".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("novo_nome"));
        assert!(json.contains("Ana Clara"));
    }

    #[test]
    fn cadastro_form_accepts_missing_fields() {
        let form: CadastroForm = serde_json::from_str(r#"{"email": "ana@x.com"}"#).unwrap();
        assert!(form.name.is_none());
        assert_eq!(form.email.as_deref(), Some("ana@x.com"));
        assert!(form.password.is_none());
    }
}
