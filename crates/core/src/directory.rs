//! Directory lookup of the record service by name.

use crate::config::ServiceEndpoint;
use crate::constants::NAME_SERVICE_ID;
use crate::error::{ClientResult, Operation};
use crate::faults::{self, Phase};
use crate::transport::{with_deadline, NameComponent, ObjectReference, TransportHandle};
use std::time::Duration;

/// Resolves a service name to an object reference through the runtime's naming service.
///
/// Holds no state beyond the per-call deadline; resolving is idempotent and safe to retry.
#[derive(Clone, Debug)]
pub struct DirectoryResolver {
    request_timeout: Duration,
}

impl DirectoryResolver {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }

    /// The single-component name `{service_name, ""}` the service is registered under.
    pub fn service_name(endpoint: &ServiceEndpoint) -> Vec<NameComponent> {
        vec![NameComponent::new(endpoint.service_name())]
    }

    /// Look up `endpoint.service_name` in the root naming context of `handle`.
    ///
    /// # Errors
    ///
    /// - `DirectoryUnavailable` if the root context is absent or cannot be reached.
    /// - `NotFound` if nothing is registered under the name.
    pub async fn resolve(
        &self,
        handle: &dyn TransportHandle,
        endpoint: &ServiceEndpoint,
    ) -> ClientResult<ObjectReference> {
        let target = endpoint.service_name();

        let root = with_deadline(
            self.request_timeout,
            handle.resolve_initial_references(NAME_SERVICE_ID),
        )
        .await
        .map_err(|e| faults::translate(Phase::Resolve, Operation::Connect, target, e))?
        .ok_or_else(|| faults::directory_absent(target, &endpoint.authority()))?;

        let name = Self::service_name(endpoint);
        let reference = with_deadline(self.request_timeout, root.resolve(&name))
            .await
            .map_err(|e| faults::translate(Phase::Resolve, Operation::Connect, target, e))?;

        tracing::debug!(service = target, directory = %endpoint.authority(), "name resolved");
        Ok(reference)
    }
}
