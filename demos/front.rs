use dragon_mvc::diagnostics::ErrorKind;
use dragon_mvc::{
    halt, ActionContext, Application, Controller, Error, Layout, Registry, Request,
    RequestTarget, Settings,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Site {
    #[serde(rename = "SITE_NAME")]
    name: String,
}

struct UserModel {
    names: Vec<&'static str>,
}

struct IndexController;

impl Controller for IndexController {
    fn supports(&self, action: &str) -> bool {
        matches!(action, "index" | "users")
    }

    fn call(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error> {
        let site: Site = cx.app().settings().extract()?;
        match action {
            "users" => {
                let model: UserModel = cx.load("UserModel")?;
                cx.echo(&format!("{}: {}", site.name, model.names.join(", ")));
            }
            _ => {
                cx.trigger(ErrorKind::UserNotice, "index page has no content yet")?;
                cx.echo(&format!("Welcome to {}", site.name));
            }
        }
        Ok(())
    }
}

fn router(request: &Request, _settings: &Settings) -> Result<RequestTarget, Error> {
    let param = |key: &str, default: &str| {
        request
            .query
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };
    Ok(RequestTarget::new(
        param("a", "Home"),
        param("c", "Index"),
        param("m", "index"),
    ))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = Registry::new(Layout::new("demos/site"))
        .with_controller("Home", "IndexController", || IndexController)
        .with_model("UserModel", || UserModel {
            names: vec!["ada", "grace"],
        })
        .with_library("functions", |ctx| {
            if let Some(session) = ctx.session_mut() {
                session.set("theme", "dark");
            }
            Ok(())
        })
        .with_default_empty_controller();
    let app = Application::new(registry);

    for (controller, action) in [("Index", "index"), ("Index", "users"), ("Missing", "index")] {
        let request = Request::new("localhost:8080", "/index.php")
            .with_query("c", controller)
            .with_query("m", action);

        match app.run(&request, &router) {
            Ok(response) => println!("{:?} -> {}", response.invocation, response.body),
            Err(e) => halt(&e),
        }
    }
}
