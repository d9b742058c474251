use clap::Args;
use session::{AppRoute, GuardDecision, RouteGuard, SessionService};

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Client route to check, e.g. `/home` or `/profile/saved`
    pub path: String,
}

/// Print the guard decision for `args.path` against the stored session.
pub fn open(session: &SessionService, args: &OpenArgs) {
    let state = session.initialize();
    let route = AppRoute::parse(&args.path);
    println!("{}", describe(&route, &RouteGuard::resolve(&state, &route)));
}

fn describe(route: &AppRoute, decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Loading => "loading".to_string(),
        GuardDecision::Redirect { to, replace: true } => format!("redirect {to} (replace)"),
        GuardDecision::Redirect { to, replace: false } => format!("redirect {to}"),
        GuardDecision::Render if *route == AppRoute::NotFound => "render /404 (not found)".to_string(),
        GuardDecision::Render => format!("render {route}"),
    }
}
