mod app;
mod launch;
mod platform;
mod session;
mod settings;
mod tabs;
mod theme;
mod widgets;
mod workers;

use clap::Parser;

use app::App;
use launch::LaunchOptions;

fn main() -> iced::Result {
    env_logger::init();

    let options = LaunchOptions::parse();
    options.warn_ignored();
    log::info!("Starting on {}", options.device);

    iced::application(move || App::new(options.clone()), App::update, App::view)
        .title("Portrait Toonify")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(900.0, 760.0),
            ..Default::default()
        })
        .run()
}
