mod app;
mod effects;
mod logging;

fn main() {
    app::run_app();
}
