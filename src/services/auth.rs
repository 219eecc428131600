// src/services/auth.rs

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

// Estrutura de dados ("claims") dentro do JWT emitido pelo provedor de login
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (quem está chamando)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued At
}

// Chamador autenticado. Só o serviço de auth constrói um; quem recebe um tem a prova.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
}

// A autenticação em si é externa: aqui só validamos o token assinado com o segredo compartilhado.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Caller, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token rejeitado: {}", e);
                AppError::Unauthorized
            })?;

        Ok(Caller {
            subject: token_data.claims.sub,
        })
    }
}
