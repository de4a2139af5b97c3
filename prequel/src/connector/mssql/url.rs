use crate::error::{Error, ErrorKind};
use connection_string::JdbcString;
use std::{fmt, str::FromStr, time::Duration};

pub(crate) const DEFAULT_DATABASE: &str = "master";
pub(crate) const DEFAULT_SCHEMA: &str = "dbo";

#[derive(Clone)]
pub(crate) struct Hidden<T>(pub(crate) T);

impl<T> fmt::Debug for Hidden<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<HIDDEN>")
    }
}

/// TLS mode when connecting to SQL Server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncryptMode {
    /// All traffic is encrypted.
    On,
    /// Only the login credentials are encrypted.
    Off,
    /// Nothing is encrypted.
    DangerPlainText,
}

impl fmt::Display for EncryptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "true"),
            Self::Off => write!(f, "false"),
            Self::DangerPlainText => write!(f, "DANGER_PLAINTEXT"),
        }
    }
}

impl FromStr for EncryptMode {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let mode = match s.parse::<bool>() {
            Ok(true) => Self::On,
            _ if s == "DANGER_PLAINTEXT" => Self::DangerPlainText,
            _ => Self::Off,
        };

        Ok(mode)
    }
}

/// Wraps a JDBC connection string and exposes the parsing logic used by
/// Prequel, including default values.
#[derive(Debug, Clone)]
pub struct MssqlUrl {
    connection_string: String,
    query_params: MssqlQueryParams,
}

#[derive(Debug, Clone)]
pub(crate) struct MssqlQueryParams {
    encrypt: EncryptMode,
    port: Option<u16>,
    host: Option<String>,
    user: Hidden<Option<String>>,
    password: Hidden<Option<String>>,
    database: String,
    schema: String,
    trust_server_certificate: bool,
    connect_timeout: Option<Duration>,
    socket_timeout: Option<Duration>,
}

impl MssqlUrl {
    /// Parse `Url` from a JDBC connection string. The `jdbc:` prefix may be
    /// left out.
    pub fn new(jdbc_connection_string: &str) -> crate::Result<Self> {
        let connection_string = with_jdbc_prefix(jdbc_connection_string);
        let query_params = Self::parse_query_params(&connection_string)?;

        Ok(Self {
            connection_string,
            query_params,
        })
    }

    fn parse_query_params(input: &str) -> crate::Result<MssqlQueryParams> {
        let mut conn: JdbcString = input.parse()?;

        let host = conn.server_name().map(|server_name| match conn.instance_name() {
            Some(instance_name) => format!(r"{server_name}\{instance_name}"),
            None => server_name.to_string(),
        });

        let port = conn.port();
        let props = conn.properties_mut();

        let user = props.remove("user");
        let password = props.remove("password");
        let database = props
            .remove("database")
            .unwrap_or_else(|| String::from(DEFAULT_DATABASE));
        let schema = props
            .remove("schema")
            .unwrap_or_else(|| String::from(DEFAULT_SCHEMA));

        let encrypt = props
            .remove("encrypt")
            .map(|mode| EncryptMode::from_str(&mode))
            .transpose()?
            .unwrap_or(EncryptMode::On);

        let trust_server_certificate = props
            .remove("trustservercertificate")
            .map(|trust| {
                trust
                    .parse::<bool>()
                    .map_err(|_| Error::builder(ErrorKind::InvalidConnectionArguments).build())
            })
            .transpose()?
            .unwrap_or(false);

        let connect_timeout = match parse_seconds(props.remove("logintimeout").or_else(|| props.remove("connecttimeout")))? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(5)),
        };

        let socket_timeout = match parse_seconds(props.remove("sockettimeout"))? {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        };

        if !props.is_empty() {
            let mut unsupported: Vec<&str> = props.keys().map(|k| k.as_str()).collect();
            unsupported.sort_unstable();

            let mut builder = Error::builder(ErrorKind::InvalidConnectionArguments);

            builder.set_original_message(format!(
                "Unsupported connection string properties: {}",
                unsupported.join(", ")
            ));

            return Err(builder.build());
        }

        Ok(MssqlQueryParams {
            encrypt,
            port,
            host,
            user: Hidden(user),
            password: Hidden(password),
            database,
            schema,
            trust_server_certificate,
            connect_timeout,
            socket_timeout,
        })
    }

    /// The database name, `master` if not given.
    pub fn dbname(&self) -> &str {
        self.query_params.database()
    }

    /// The schema queries are resolved against, `dbo` if not given.
    pub fn schema(&self) -> &str {
        self.query_params.schema()
    }

    /// The database host, `localhost` if not given. Holds the instance name
    /// after a backslash when connecting to a named instance.
    pub fn host(&self) -> &str {
        self.query_params.host()
    }

    /// The database port, `1433` if not given.
    pub fn port(&self) -> u16 {
        self.query_params.port()
    }

    /// The user to authenticate as.
    pub fn username(&self) -> Option<&str> {
        self.query_params.user()
    }

    /// The password to authenticate with.
    pub fn password(&self) -> Option<&str> {
        self.query_params.password()
    }

    /// The TLS mode of the traffic to the server.
    pub fn encrypt(&self) -> EncryptMode {
        self.query_params.encrypt()
    }

    /// Whether the server certificate is taken at face value.
    pub fn trust_server_certificate(&self) -> bool {
        self.query_params.trust_server_certificate()
    }

    /// The wait time for the socket to the database to be opened. Zero in
    /// the connection string disables the timeout.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.query_params.connect_timeout()
    }

    /// The wait time for a single request to the server to complete.
    pub fn socket_timeout(&self) -> Option<Duration> {
        self.query_params.socket_timeout()
    }

    /// The whole connection string, with the `jdbc:` prefix.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

fn with_jdbc_prefix(input: &str) -> String {
    if input.starts_with("jdbc:") {
        input.to_owned()
    } else {
        format!("jdbc:{input}")
    }
}

fn parse_seconds(value: Option<String>) -> crate::Result<Option<u64>> {
    value
        .map(|secs| {
            secs.parse()
                .map_err(|_| Error::builder(ErrorKind::InvalidConnectionArguments).build())
        })
        .transpose()
}

impl MssqlQueryParams {
    fn encrypt(&self) -> EncryptMode {
        self.encrypt
    }

    fn port(&self) -> u16 {
        self.port.unwrap_or(1433)
    }

    fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("localhost")
    }

    fn user(&self) -> Option<&str> {
        self.user.0.as_deref()
    }

    fn password(&self) -> Option<&str> {
        self.password.0.as_deref()
    }

    fn database(&self) -> &str {
        &self.database
    }

    fn schema(&self) -> &str {
        &self.schema
    }

    fn trust_server_certificate(&self) -> bool {
        self.trust_server_certificate
    }

    fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    fn socket_timeout(&self) -> Option<Duration> {
        self.socket_timeout
    }
}
