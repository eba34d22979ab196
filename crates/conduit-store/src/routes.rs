use async_trait::async_trait;
use conduit_core::model::Route;
use conduit_core::{ManagerError, RouteManager};
use dashmap::DashMap;

use crate::{new_id, now};

/// Custom routes held in memory
#[derive(Default)]
pub struct MemoryRoutes {
    routes: DashMap<String, Route>,
}

fn validate(route: &Route) -> Result<(), ManagerError> {
    if route.name.is_empty() {
        return Err(ManagerError::validation("route name is empty"));
    }
    if !route.path.starts_with('/') {
        return Err(ManagerError::validation(format!(
            "route path `{}` must start with /",
            route.path
        )));
    }
    if route.steps.is_empty() {
        return Err(ManagerError::validation("route requires at least one step"));
    }

    for (index, step) in route.steps.iter().enumerate() {
        if step.provider.is_empty() || step.model.is_empty() {
            return Err(ManagerError::validation(format!(
                "step {index} requires a provider and a model"
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl RouteManager for MemoryRoutes {
    async fn create_route(&self, mut route: Route) -> Result<Route, ManagerError> {
        validate(&route)?;

        if self.routes.iter().any(|entry| entry.path == route.path) {
            return Err(ManagerError::validation(format!(
                "route path `{}` is already taken",
                route.path
            )));
        }

        route.id = new_id();
        route.created_at = now();
        route.updated_at = route.created_at;
        self.routes.insert(route.id.clone(), route.clone());

        tracing::debug!(route_id = %route.id, path = %route.path, "route created");
        Ok(route)
    }

    async fn get_route(&self, id: &str) -> Result<Route, ManagerError> {
        self.routes
            .get(id)
            .map(|route| route.clone())
            .ok_or_else(|| ManagerError::not_found(format!("route {id} is not found")))
    }

    async fn get_routes(&self) -> Result<Vec<Route>, ManagerError> {
        let mut routes: Vec<Route> = self.routes.iter().map(|entry| entry.value().clone()).collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(routes)
    }

    async fn delete_route(&self, id: &str) -> Result<(), ManagerError> {
        self.routes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ManagerError::not_found(format!("route {id} is not found")))
    }
}

#[cfg(test)]
mod tests {
    use conduit_core::ErrorKind;
    use conduit_core::model::Step;

    use super::*;

    fn route(path: &str) -> Route {
        Route {
            name: "chat".to_owned(),
            path: path.to_owned(),
            steps: vec![Step {
                provider: "openai".to_owned(),
                model: "gpt-4o".to_owned(),
                ..Step::default()
            }],
            ..Route::default()
        }
    }

    #[tokio::test]
    async fn path_and_steps_are_validated() {
        let routes = MemoryRoutes::default();

        let err = routes.create_route(route("chat")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut no_steps = route("/chat");
        no_steps.steps.clear();
        assert_eq!(routes.create_route(no_steps).await.unwrap_err().kind(), ErrorKind::Validation);

        let mut no_model = route("/chat");
        no_model.steps[0].model.clear();
        let err = routes.create_route(no_model).await.unwrap_err();
        assert_eq!(err.message(), "step 0 requires a provider and a model");
    }

    #[tokio::test]
    async fn lifecycle() {
        let routes = MemoryRoutes::default();
        let created = routes.create_route(route("/chat")).await.unwrap();

        assert_eq!(routes.get_route(&created.id).await.unwrap(), created);
        assert_eq!(routes.get_routes().await.unwrap().len(), 1);

        let taken = routes.create_route(route("/chat")).await.unwrap_err();
        assert_eq!(taken.kind(), ErrorKind::Validation);

        routes.delete_route(&created.id).await.unwrap();
        assert_eq!(routes.get_route(&created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(routes.delete_route(&created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
