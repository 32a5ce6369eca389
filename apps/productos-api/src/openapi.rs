use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Productos API",
        version = "0.1.0",
        description = "Catalogue of productos and their categorias, with photo uploads"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/productos", api = domain_productos::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_productos_paths_are_nested() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/v1/productos/v2"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/productos/upload/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/productos/{id}"));
    }
}
