use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = acid_warp::config::Config::parse();
    acid_warp::app::run(cfg)
}
