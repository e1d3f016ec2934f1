//! REST resources: health, nodes, favorites and sensor data.
//!
//! Each operation is a single request. Favorites belong to the signed-in
//! user, so they refuse to run without a session; the rest send the bearer
//! token when there is one and let the backend decide.

use rootwire_protocol::{
    DeviceId, HealthCheckResponse, NodeCreateRequest, NodeDataCreateRequest, NodeDataItem,
    NodeFavoriteCreateRequest, NodeFavoriteItem, NodeResponse, NodeUpdateRequest, NodesResponse,
};
use rootwire_transport::{Method, Transport};
use serde::de::IgnoredAny;

use crate::client::{ApiClient, logged};
use crate::error::ApiResult;

impl<T: Transport> ApiClient<T> {
    /// `GET /healthcheck/`: backend liveness and version.
    pub async fn healthcheck_ping(&self) -> ApiResult<HealthCheckResponse> {
        logged("healthcheck_ping", self.get("/healthcheck/").await)
    }

    // -- nodes ------------------------------------------------------------

    /// `GET /nodes/`: every registered node.
    pub async fn get_all_nodes(&self) -> ApiResult<NodesResponse> {
        logged("get_all_nodes", self.get("/nodes/").await)
    }

    /// `POST /nodes/`: registers a node.
    pub async fn create_node(&self, node: &NodeCreateRequest) -> ApiResult<NodeResponse> {
        logged("create_node", self.send(Method::Post, "/nodes/", node).await)
    }

    /// `GET /nodes/{id}`.
    pub async fn get_node(&self, device_id: DeviceId) -> ApiResult<NodeResponse> {
        logged("get_node", self.get(&format!("/nodes/{}", device_id.0)).await)
    }

    /// `PUT /nodes/{id}`: changes status fields and returns the updated node.
    pub async fn update_node(
        &self,
        device_id: DeviceId,
        update: &NodeUpdateRequest,
    ) -> ApiResult<NodeResponse> {
        let path = format!("/nodes/{}", device_id.0);
        logged("update_node", self.send(Method::Put, &path, update).await)
    }

    /// `DELETE /nodes/{id}`.
    pub async fn delete_node(&self, device_id: DeviceId) -> ApiResult<()> {
        let path = format!("/nodes/{}", device_id.0);
        logged("delete_node", self.request_ack(Method::Delete, &path, None).await)
    }

    // -- favorites ----------------------------------------------------------

    /// The signed-in user's favorite nodes. An empty list is a success.
    pub async fn get_favorite_nodes(&self) -> ApiResult<Vec<NodeFavoriteItem>> {
        logged(
            "get_favorite_nodes",
            async {
                let session = self.require_session()?;
                self.get(&format!("/favorites/user/{}/", session.user_id().0))
                    .await
            }
            .await,
        )
    }

    /// `POST /favorites`. Requires a session; without one nothing is sent.
    pub async fn add_favorite_node(&self, device_id: DeviceId) -> ApiResult<()> {
        logged(
            "add_favorite_node",
            async {
                self.require_session()?;
                let body = NodeFavoriteCreateRequest { device_id };
                self.send::<_, IgnoredAny>(Method::Post, "/favorites", &body)
                    .await
                    .map(|_| ())
            }
            .await,
        )
    }

    /// `DELETE /favorites/{id}`. Requires a session; without one nothing is sent.
    pub async fn remove_favorite_node(&self, device_id: DeviceId) -> ApiResult<()> {
        logged(
            "remove_favorite_node",
            async {
                self.require_session()?;
                let path = format!("/favorites/{}", device_id.0);
                self.request_ack(Method::Delete, &path, None).await
            }
            .await,
        )
    }

    // -- sensor data --------------------------------------------------------

    /// Stored readings for one node.
    pub async fn get_node_data(&self, device_id: DeviceId) -> ApiResult<Vec<NodeDataItem>> {
        let path = format!("/nodedata/{}", device_id.0);
        logged("get_node_data", self.get(&path).await)
    }

    /// `POST /nodedata/`: stores one reading and returns it as saved.
    pub async fn add_node_data(&self, reading: &NodeDataCreateRequest) -> ApiResult<NodeDataItem> {
        logged("add_node_data", self.send(Method::Post, "/nodedata/", reading).await)
    }
}
