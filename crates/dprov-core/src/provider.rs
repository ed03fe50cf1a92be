use async_trait::async_trait;

/// Asynchronously produces a value, or fails with `Self::Error`.
///
/// Dropping the returned future cancels whatever I/O is in flight.
/// Implementations hold no per-call state, so one instance may serve any
/// number of concurrent fetches.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// The value produced on success.
    type Output: Send + 'static;
    /// The single error kind this provider fails with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce the value.
    async fn fetch(&self) -> Result<Self::Output, Self::Error>;
}

/// Like [`DataProvider`], but every fetch takes an input.
#[async_trait]
pub trait ParamDataProvider: Send + Sync {
    /// The input of a single fetch.
    type Params: Send + 'static;
    /// The value produced on success.
    type Output: Send + 'static;
    /// The single error kind this provider fails with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce the value for `params`.
    async fn fetch(&self, params: Self::Params) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    type Output = P::Output;
    type Error = P::Error;

    async fn fetch(&self) -> Result<Self::Output, Self::Error> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<P: ParamDataProvider + ?Sized> ParamDataProvider for Box<P> {
    type Params = P::Params;
    type Output = P::Output;
    type Error = P::Error;

    async fn fetch(&self, params: Self::Params) -> Result<Self::Output, Self::Error> {
        (**self).fetch(params).await
    }
}
