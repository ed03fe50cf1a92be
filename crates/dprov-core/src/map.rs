use std::marker::PhantomData;

use async_trait::async_trait;

use crate::provider::{DataProvider, ParamDataProvider};

// ---------------------------------------------------------------------------
// MapDataProvider
// ---------------------------------------------------------------------------

/// Converts the output of a [`DataProvider`] with a pure function.
///
/// The conversion runs once per successful fetch and never on failure. The
/// wrapped provider's error is returned as-is: same type, same value.
pub struct MapDataProvider<P, T, F> {
    provider: P,
    convert: F,
    _output: PhantomData<fn() -> T>,
}

impl<P, T, F> MapDataProvider<P, T, F>
where
    P: DataProvider,
    F: Fn(P::Output) -> T + Send + Sync,
{
    pub fn new(provider: P, convert: F) -> Self {
        Self {
            provider,
            convert,
            _output: PhantomData,
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P, T, F> DataProvider for MapDataProvider<P, T, F>
where
    P: DataProvider,
    T: Send + 'static,
    F: Fn(P::Output) -> T + Send + Sync,
{
    type Output = T;
    type Error = P::Error;

    async fn fetch(&self) -> Result<T, P::Error> {
        let output = self.provider.fetch().await?;
        Ok((self.convert)(output))
    }
}

// ---------------------------------------------------------------------------
// MapParamDataProvider
// ---------------------------------------------------------------------------

/// Converts the output of a [`ParamDataProvider`] with a pure function.
///
/// Inputs are forwarded unchanged; see [`MapDataProvider`] for the rules on
/// the conversion itself.
pub struct MapParamDataProvider<P, T, F> {
    provider: P,
    convert: F,
    _output: PhantomData<fn() -> T>,
}

impl<P, T, F> MapParamDataProvider<P, T, F>
where
    P: ParamDataProvider,
    F: Fn(P::Output) -> T + Send + Sync,
{
    pub fn new(provider: P, convert: F) -> Self {
        Self {
            provider,
            convert,
            _output: PhantomData,
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P, T, F> ParamDataProvider for MapParamDataProvider<P, T, F>
where
    P: ParamDataProvider,
    T: Send + 'static,
    F: Fn(P::Output) -> T + Send + Sync,
{
    type Params = P::Params;
    type Output = T;
    type Error = P::Error;

    async fn fetch(&self, params: P::Params) -> Result<T, P::Error> {
        let output = self.provider.fetch(params).await?;
        Ok((self.convert)(output))
    }
}

// ---------------------------------------------------------------------------
// Extension traits
// ---------------------------------------------------------------------------

/// Adds [`map`](DataProviderExt::map) to every [`DataProvider`].
pub trait DataProviderExt: DataProvider + Sized {
    /// Wrap `self`, converting each successful output with `convert`.
    fn map<T, F>(self, convert: F) -> MapDataProvider<Self, T, F>
    where
        F: Fn(Self::Output) -> T + Send + Sync,
    {
        MapDataProvider::new(self, convert)
    }
}

impl<P: DataProvider> DataProviderExt for P {}

/// Adds [`map`](ParamDataProviderExt::map) to every [`ParamDataProvider`].
pub trait ParamDataProviderExt: ParamDataProvider + Sized {
    /// Wrap `self`, converting each successful output with `convert`.
    fn map<T, F>(self, convert: F) -> MapParamDataProvider<Self, T, F>
    where
        F: Fn(Self::Output) -> T + Send + Sync,
    {
        MapParamDataProvider::new(self, convert)
    }
}

impl<P: ParamDataProvider> ParamDataProviderExt for P {}
