//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the wire
//! DTOs and the bearer-token security scheme. Swagger UI serves it in debug
//! builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{City, Error, ErrorCode, ItemType, ReceptionStatus, Role};
use crate::inbound::http::accounts::{DummyLoginRequest, LoginRequest, RegisterRequest};
use crate::inbound::http::dto::{
    AccountResponse, ItemResponse, PickupPointListItem, PickupPointPageResponse,
    PickupPointResponse, ReceptionResponse, ReceptionWithItemsResponse,
};
use crate::inbound::http::pickup_points::CreatePickupPointRequest;
use crate::inbound::http::receptions::{AddItemRequest, OpenReceptionRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Enrich the generated document with the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/v1/dummyLogin or POST /api/v1/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PVZ backend API",
        description = "Pickup point registry with goods reception lifecycle and role-gated access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::dummy_login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::pickup_points::create_pickup_point,
        crate::inbound::http::pickup_points::list_pickup_points,
        crate::inbound::http::pickup_points::list_all_pickup_points,
        crate::inbound::http::pickup_points::close_last_reception,
        crate::inbound::http::pickup_points::delete_last_product,
        crate::inbound::http::receptions::open_reception,
        crate::inbound::http::receptions::add_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        City,
        ItemType,
        ReceptionStatus,
        Role,
        DummyLoginRequest,
        RegisterRequest,
        LoginRequest,
        AccountResponse,
        CreatePickupPointRequest,
        OpenReceptionRequest,
        AddItemRequest,
        PickupPointResponse,
        ReceptionResponse,
        ItemResponse,
        ReceptionWithItemsResponse,
        PickupPointListItem,
        PickupPointPageResponse,
    )),
    tags(
        (name = "accounts", description = "Token issuing, registration and login"),
        (name = "pickup points", description = "Pickup point registry and listing"),
        (name = "receptions", description = "Reception lifecycle"),
        (name = "items", description = "Items received into an open reception"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("PickupPointResponse", "registrationDate")]
    #[case("ReceptionResponse", "dateTime")]
    #[case("ItemResponse", "type")]
    #[case("PickupPointPageResponse", "total")]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/dummyLogin")]
    #[case("/api/v1/pvz")]
    #[case("/api/v1/pvz/all")]
    #[case("/api/v1/pvz/{pvzId}/close_last_reception")]
    #[case("/api/v1/pvz/{pvzId}/delete_last_product")]
    #[case("/api/v1/receptions")]
    #[case("/api/v1/products")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.security_schemes.get(BEARER_SCHEME) {
            Some(SecurityScheme::Http(http)) => {
                assert_eq!(http.scheme, HttpAuthScheme::Bearer);
                assert_eq!(http.bearer_format.as_deref(), Some("JWT"));
            }
            other => panic!("expected bearer scheme, got {other:?}"),
        }
    }
}
