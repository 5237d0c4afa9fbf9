use std::io::{BufRead, Write};

/// prints the prompt and reads a single line, newline included
pub fn read_line<P>(prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    let mut stdout = std::io::stdout().lock();

    stdout.write_all(prompt.as_ref().as_bytes())?;
    stdout.flush()?;

    let mut buffer = String::new();

    std::io::stdin().lock().read_line(&mut buffer)?;

    Ok(buffer)
}

pub fn prompt<P>(prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    read_line(prompt).map(|given| given.trim().to_owned())
}

/// reads without echoing to the terminal
pub fn read_password<P>(prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    rpassword::prompt_password(prompt.as_ref())
}

/// anything starting with `y` or `Y` is a yes, everything else is a no
pub fn confirm<P>(question: P) -> std::io::Result<bool>
where
    P: std::fmt::Display
{
    let given = prompt(format!("{} [y|n]: ", question))?;

    Ok(given.starts_with(['y', 'Y']))
}
