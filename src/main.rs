use xmk::work::CommandFailed;

fn main() {
    let code = match xmk::run::run() {
        Ok(code) => code,
        Err(err) => {
            if xmk::log::verbose() {
                eprintln!("[error] {}", err);
            } else {
                eprintln!("[error]: {}", err);
            }
            match err.downcast_ref::<CommandFailed>() {
                Some(failed) => failed.code,
                None => 1,
            }
        }
    };
    std::process::exit(code);
}
