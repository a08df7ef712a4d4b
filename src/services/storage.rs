// src/services/storage.rs

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::error::AppError;

// Um arquivo recebido pela camada HTTP (multipart), ainda não persistido.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Armazenamento de arquivos endereçado por nome gerado.
///
/// O banco guarda apenas o `stored_name` devolvido por `store`; o conteúdo
/// vive fora da transação. Por isso todo caminho de falha que já gravou um
/// arquivo precisa chamar `delete` como compensação.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AppError>;
    async fn delete(&self, stored_name: &str) -> Result<(), AppError>;
    async fn exists(&self, stored_name: &str) -> bool;
    async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AppError>;
}

// Implementação em disco local, um diretório plano.
pub struct FsBlobStore {
    base_dir: PathBuf,
}

impl FsBlobStore {
    pub async fn new(base_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    // Nomes gerados nunca contêm separador de caminho; ainda assim, qualquer
    // nome vindo do banco passa por esta validação antes de tocar o disco.
    fn path_of(&self, stored_name: &str) -> Result<PathBuf, AppError> {
        if stored_name.is_empty()
            || stored_name.contains('/')
            || stored_name.contains('\\')
            || stored_name.contains("..")
        {
            return Err(AppError::InvalidInput(format!(
                "Nome de arquivo inválido: {stored_name}"
            )));
        }
        Ok(self.base_dir.join(stored_name))
    }
}

/// Gera o nome físico: um UUID novo mais a extensão original saneada.
pub fn generate_stored_name(suggested_name: &str) -> String {
    let extension: String = suggested_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect();

    if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), extension.to_lowercase())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AppError> {
        let stored_name = generate_stored_name(suggested_name);
        let path = self.path_of(&stored_name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao gravar arquivo {stored_name}: {e}"))?;
        Ok(stored_name)
    }

    async fn delete(&self, stored_name: &str) -> Result<(), AppError> {
        let path = self.path_of(stored_name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao remover arquivo {stored_name}: {e}"))?;
        Ok(())
    }

    async fn exists(&self, stored_name: &str) -> bool {
        match self.path_of(stored_name) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_of(stored_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::StorageInconsistency(stored_name.to_string()))
            }
            Err(e) => Err(anyhow::anyhow!("Falha ao ler arquivo {stored_name}: {e}").into()),
        }
    }
}

/// Compensação: remove um arquivo que ficou órfão por uma falha posterior.
/// Falha de limpeza é logada e engolida; o erro original prevalece.
pub async fn cleanup_blob(storage: &dyn BlobStore, stored_name: &str) {
    if let Err(e) = storage.delete(stored_name).await {
        tracing::warn!("Falha na limpeza do arquivo órfão {}: {}", stored_name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn store_read_delete_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path()).await.unwrap();

        let stored = store.store(b"conteudo", "balancete.pdf").await.unwrap();
        assert!(stored.ends_with(".pdf"));
        assert!(store.exists(&stored).await);
        assert_eq!(store.read(&stored).await.unwrap(), b"conteudo");

        store.delete(&stored).await.unwrap();
        assert!(!store.exists(&stored).await);
    }

    #[tokio::test]
    async fn read_missing_file_reports_inconsistency() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path()).await.unwrap();

        let err = store.read("nao-existe.pdf").await.unwrap_err();
        assert!(matches!(err, AppError::StorageInconsistency(_)));
    }

    #[tokio::test]
    async fn rejects_path_traversal_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(temp_dir.path()).await.unwrap();

        assert!(store.read("../fora.txt").await.is_err());
        assert!(!store.exists("../fora.txt").await);
    }

    #[test]
    fn generated_names_have_no_separators() {
        let name = generate_stored_name("../../estatuto final.DOCX");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".docx"));

        // Sem extensão aproveitável, fica só o UUID.
        let bare = generate_stored_name("arquivo");
        assert!(!bare.contains('.'));
    }
}
