use reqwest::{Client, ClientBuilder};
use reqwest_middleware as rqm;

use crate::client::SiwxClient;

/// Attaches a [`SiwxClient`] to a reqwest client or builder.
pub trait ReqwestWithSiwx<A> {
    /// Wraps `self` so every request is signed with a CAIP-122 assertion.
    fn with_siwx(self, siwx_client: SiwxClient) -> ReqwestWithSiwxBuilder<A>;
}

impl ReqwestWithSiwx<Client> for Client {
    fn with_siwx(self, siwx_client: SiwxClient) -> ReqwestWithSiwxBuilder<Client> {
        ReqwestWithSiwxBuilder {
            inner: self,
            siwx_client,
        }
    }
}

impl ReqwestWithSiwx<ClientBuilder> for ClientBuilder {
    fn with_siwx(self, siwx_client: SiwxClient) -> ReqwestWithSiwxBuilder<ClientBuilder> {
        ReqwestWithSiwxBuilder {
            inner: self,
            siwx_client,
        }
    }
}

impl ReqwestWithSiwx<rqm::ClientBuilder> for rqm::ClientBuilder {
    fn with_siwx(self, siwx_client: SiwxClient) -> ReqwestWithSiwxBuilder<rqm::ClientBuilder> {
        ReqwestWithSiwxBuilder {
            inner: self,
            siwx_client,
        }
    }
}

/// Intermediate builder pairing a reqwest client (or builder) with a
/// [`SiwxClient`].
pub struct ReqwestWithSiwxBuilder<A> {
    inner: A,
    siwx_client: SiwxClient,
}

/// Finishes a [`ReqwestWithSiwxBuilder`] into a middleware-enabled client.
pub trait ReqwestWithSiwxBuild {
    /// The built client type.
    type BuildResult;
    /// The middleware builder type, for stacking further middlewares (such as
    /// an x402 payment middleware) after the sign-in layer.
    type BuilderResult;

    /// Builds the final client.
    fn build(self) -> Self::BuildResult;
    /// Returns a middleware builder with the sign-in layer installed.
    fn builder(self) -> Self::BuilderResult;
}

impl ReqwestWithSiwxBuild for ReqwestWithSiwxBuilder<Client> {
    type BuildResult = rqm::ClientWithMiddleware;
    type BuilderResult = rqm::ClientBuilder;

    fn build(self) -> Self::BuildResult {
        self.builder().build()
    }

    fn builder(self) -> Self::BuilderResult {
        rqm::ClientBuilder::new(self.inner).with(self.siwx_client)
    }
}

impl ReqwestWithSiwxBuild for ReqwestWithSiwxBuilder<ClientBuilder> {
    type BuildResult = Result<rqm::ClientWithMiddleware, reqwest::Error>;
    type BuilderResult = Result<rqm::ClientBuilder, reqwest::Error>;

    fn build(self) -> Self::BuildResult {
        let builder = self.builder()?;
        Ok(builder.build())
    }

    fn builder(self) -> Self::BuilderResult {
        let client = self.inner.build()?;
        Ok(rqm::ClientBuilder::new(client).with(self.siwx_client))
    }
}

impl ReqwestWithSiwxBuild for ReqwestWithSiwxBuilder<rqm::ClientBuilder> {
    type BuildResult = rqm::ClientWithMiddleware;
    type BuilderResult = rqm::ClientBuilder;

    fn build(self) -> Self::BuildResult {
        self.builder().build()
    }

    fn builder(self) -> Self::BuilderResult {
        self.inner.with(self.siwx_client)
    }
}
