use mongodb::error::ErrorKind;
use slidedeck_seed::SeedError;
use slidedeck_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Document store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Seeding failed: {0}")]
    SeedError(#[from] SeedError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Other: {0}")]
    Other(#[from] eyre::Report),
}

impl CliError {
    pub fn print_tip(&self) {
        match self {
            CliError::ConfigError(error) => {
                eprintln!("⚙️  Configuration error occurred:");
                eprintln!("   • Error details: {error}");
                eprintln!("   • Check `configuration/config.yml` and the SLIDEDECK_* variables");
            }
            CliError::StoreError(error) => print_store_tip(error),
            CliError::SeedError(error) => print_seed_tip(error),
            CliError::IoError(error) => {
                eprintln!("💡 I/O error:");
                eprintln!("   • {error}");
            }
            CliError::Other(error) => {
                eprintln!("💡 Unexpected error occurred:");
                eprintln!("   • Error details: {error}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigError(_) => 10,
            CliError::IoError(_) => 11,
            CliError::StoreError(_) => 12,
            CliError::SeedError(SeedError::Connection(_) | SeedError::Insert { .. }) => 12,
            CliError::SeedError(_) => 13,
            CliError::Other(_) => 99,
        }
    }

    pub fn exit_with_tips(self) -> ! {
        eprintln!("❌ {self}");
        self.print_tip();
        std::process::exit(self.exit_code());
    }
}

fn print_store_tip(error: &StoreError) {
    eprintln!("💡 Document store error:");
    match error {
        StoreError::MissingUri => {
            eprintln!("   • Set `MONGO_URI` in the environment or in a `.env` file");
        }
        StoreError::MissingDatabase => {
            eprintln!("   • Set `MONGO_DB_NAME` or add the database to the connection string");
            eprintln!("   • e.g. mongodb://localhost:27017/slides_db");
        }
        StoreError::Driver(err) => match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } => {
                eprintln!("   • No server answered within the selection timeout");
                eprintln!("   • Check that MongoDB is running and reachable from this host");
            }
            ErrorKind::Authentication { .. } => {
                eprintln!("   • Authentication failed, check the credentials in `MONGO_URI`");
            }
            ErrorKind::InvalidArgument { .. } => {
                eprintln!("   • The connection string or an option is invalid: {err}");
            }
            ErrorKind::DnsResolve { .. } => {
                eprintln!("   • The host in `MONGO_URI` could not be resolved");
            }
            _ => {
                eprintln!("   • MongoDB error: {err}");
            }
        },
        StoreError::Encode(err) => {
            eprintln!("   • The slide could not be converted to BSON: {err}");
        }
        StoreError::MalformedDocument(msg) => {
            eprintln!("   • A stored document does not look like a slide: {msg}");
        }
        StoreError::Unavailable => {
            eprintln!("   • The store is not reachable");
        }
    }
}

fn print_seed_tip(error: &SeedError) {
    match error {
        SeedError::Connection(err) => {
            eprintln!("💡 Nothing was inserted.");
            print_store_tip(err);
        }
        SeedError::Insert {
            path,
            source,
            inserted,
        } => {
            eprintln!("💡 `{path}` was not inserted.");
            if inserted.is_empty() {
                eprintln!("   • No slide was kept");
            } else {
                eprintln!("   • {} slides were kept:", inserted.len());
                for (file, id) in inserted {
                    eprintln!("     - {file} ({id})");
                }
            }
            print_store_tip(source);
        }
        SeedError::FileName { path } => {
            eprintln!("💡 `{}` cannot be seeded:", path.display());
            eprintln!("   • Rename the file using UTF-8 characters only");
        }
        SeedError::Directory { path, source } => {
            eprintln!("💡 Cannot read the slides directory `{path}`:");
            match source.kind() {
                std::io::ErrorKind::NotFound => {
                    eprintln!("   • The directory does not exist");
                    eprintln!("   • Create it or point `seed --dir` at the right place");
                }
                std::io::ErrorKind::PermissionDenied => {
                    eprintln!("   • Permission denied - check directory permissions");
                }
                _ => {
                    eprintln!("   • File system error: {source}");
                }
            }
        }
        SeedError::Read { path, source } => {
            eprintln!("💡 Cannot read `{path}`:");
            eprintln!("   • {source}");
        }
        SeedError::Parse { path, source } => {
            eprintln!("💡 Failed to parse `{path}`:");
            if source.is_syntax() {
                eprintln!(
                    "   • JSON syntax error at line {}, column {}",
                    source.line(),
                    source.column()
                );
                eprintln!("   • Check for missing commas, brackets, or quotes near this location");
                eprintln!("   • Look for trailing commas or unclosed strings");
            } else if source.is_eof() {
                eprintln!("   • Unexpected end of file");
                eprintln!("   • The file appears to be incomplete");
            } else {
                eprintln!("   • JSON parsing error: {source}");
            }
            eprintln!("   • No file after this one was inserted");
        }
        SeedError::Payload { path, source } => {
            eprintln!("💡 `{path}` is valid JSON but not a slide:");
            eprintln!("   • {source}");
            eprintln!("   • Each file must hold exactly one JSON object");
        }
    }
}

pub trait ExitOnError<T> {
    fn or_exit(self) -> T;
}

impl<T> ExitOnError<T> for Result<T, CliError> {
    fn or_exit(self) -> T {
        self.unwrap_or_else(|err| err.exit_with_tips())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use slidedeck_store::SlideId;

    #[test]
    fn exit_codes_follow_the_error_category() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let malformed = CliError::from(SeedError::Parse {
            path: Utf8PathBuf::from("slides/slide1.json"),
            source: parse_error,
        });
        assert_eq!(malformed.exit_code(), 13);

        let unreachable = CliError::from(SeedError::Connection(StoreError::Unavailable));
        assert_eq!(unreachable.exit_code(), 12);

        let rejected = CliError::from(SeedError::Insert {
            path: Utf8PathBuf::from("slides/slide2.json"),
            source: StoreError::Unavailable,
            inserted: vec![(Utf8PathBuf::from("slides/slide1.json"), SlideId::generate())],
        });
        assert_eq!(rejected.exit_code(), 12);

        let unnamed = CliError::from(SeedError::FileName {
            path: std::path::PathBuf::from("slides/slide?.json"),
        });
        assert_eq!(unnamed.exit_code(), 13);

        assert_eq!(CliError::from(StoreError::MissingUri).exit_code(), 12);
        assert_eq!(CliError::from(eyre::eyre!("boom")).exit_code(), 99);
    }
}
