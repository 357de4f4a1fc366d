/// Begins transactions for the configured storage backend.
///
/// Repos that take a [`StorageTx`] downcast it to their own concrete
/// transaction type; the server wires each backend's repos to the matching
/// manager, so a mismatch cannot occur at runtime.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
