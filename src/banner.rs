// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
                 _       _           _
   ___ ___   __| | ___  (_)_   _  __| | __ _  ___
  / __/ _ \ / _` |/ _ \ | | | | |/ _` |/ _` |/ _ \
 | (_| (_) | (_| |  __/ | | |_| | (_| | (_| |  __/
  \___\___/ \__,_|\___|_/ |\__,_|\__,_|\__, |\___|
                      |__/             |___/

    Remote Code Execution & Test Verdicts
"#;
    println!("{}", banner);
}
