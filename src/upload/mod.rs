#[cfg(feature = "upload-client")]
mod http;

#[cfg(feature = "upload-client")]
pub use http::HttpFileStore;

use async_trait::async_trait;

use crate::error::Result;

/// 已暂存的文件引用
#[derive(Clone, Debug)]
pub struct StagedFile {
    pub id: String,
    pub filename: String,
}

/// 文件上传协作方
///
/// 附件型流程用它把产物暂存到外部对象存储，运行结束后的删除是
/// 尽力而为：失败只记录，不影响流程结果。
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create(&self, filename: &str, bytes: Vec<u8>) -> Result<StagedFile>;
    async fn delete(&self, id: &str) -> Result<()>;
}
