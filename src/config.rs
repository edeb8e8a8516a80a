pub const DEFAULT_MAIL_FROM: &str =
    "Privacy Seminar <no-reply@metrics.privacybydesign.foundation>";
pub const DEFAULT_MAIL_SUBJECT: &str = "Your presence at Privacy and Identity";
pub const DEFAULT_MAIL_COURSE: &str = "Privacy and Identity";
pub const DEFAULT_MAIL_SIGNATURE: &str = "Koning and Jacobs";

#[derive(Debug, Clone)]
pub struct Config {
    pub allowed_tokens: Vec<String>,
    /// `host:port`, resolved when the listener binds.
    pub bind_addr: String,
    pub db_path: String,
    pub max_body_size: usize,
    pub notify_workers: usize,
    pub notify_queue: usize,
    pub log_level: String,
    pub smtp: SmtpConfig,
    pub mail: MailTemplate,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<(String, String)>,
}

/// Fixed parts of the confirmation mail.
#[derive(Debug, Clone)]
pub struct MailTemplate {
    pub from: String,
    pub subject: String,
    pub course: String,
    pub signature: String,
}

impl Default for MailTemplate {
    fn default() -> Self {
        Self {
            from: DEFAULT_MAIL_FROM.to_string(),
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
            course: DEFAULT_MAIL_COURSE.to_string(),
            signature: DEFAULT_MAIL_SIGNATURE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let allowed_tokens: Vec<String> = env_or("ATTENDANCE_ALLOWED_TOKENS", "")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let bind_addr = parse_bind_addr(&env_or("ATTENDANCE_BIND_ADDR", "0.0.0.0:8080"))?;

        let db_path = env_or("ATTENDANCE_DB_PATH", "db.sqlite3");

        let max_body_size: usize = env_or("ATTENDANCE_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid ATTENDANCE_MAX_BODY_SIZE: {e}"))?;

        let notify_workers: usize = env_or("ATTENDANCE_NOTIFY_WORKERS", "2")
            .parse()
            .map_err(|e| format!("Invalid ATTENDANCE_NOTIFY_WORKERS: {e}"))?;
        if notify_workers == 0 {
            return Err("ATTENDANCE_NOTIFY_WORKERS must be at least 1".to_string());
        }

        let notify_queue: usize = env_or("ATTENDANCE_NOTIFY_QUEUE", "256")
            .parse()
            .map_err(|e| format!("Invalid ATTENDANCE_NOTIFY_QUEUE: {e}"))?;
        if notify_queue == 0 {
            return Err("ATTENDANCE_NOTIFY_QUEUE must be at least 1".to_string());
        }

        let log_level = env_or("ATTENDANCE_LOG_LEVEL", "info");

        let credentials = match (lookup("ATTENDANCE_SMTP_USER"), lookup("ATTENDANCE_SMTP_PASS")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (None, None) => None,
            _ => {
                return Err(
                    "ATTENDANCE_SMTP_USER and ATTENDANCE_SMTP_PASS must be set together"
                        .to_string(),
                );
            }
        };

        let smtp = SmtpConfig {
            host: env_or("ATTENDANCE_SMTP_HOST", "localhost"),
            port: env_or("ATTENDANCE_SMTP_PORT", "25")
                .parse()
                .map_err(|e| format!("Invalid ATTENDANCE_SMTP_PORT: {e}"))?,
            credentials,
        };

        let mail = MailTemplate {
            from: env_or("ATTENDANCE_MAIL_FROM", DEFAULT_MAIL_FROM),
            subject: env_or("ATTENDANCE_MAIL_SUBJECT", DEFAULT_MAIL_SUBJECT),
            course: env_or("ATTENDANCE_MAIL_COURSE", DEFAULT_MAIL_COURSE),
            signature: env_or("ATTENDANCE_MAIL_SIGNATURE", DEFAULT_MAIL_SIGNATURE),
        };

        Ok(Config {
            allowed_tokens,
            bind_addr,
            db_path,
            max_body_size,
            notify_workers,
            notify_queue,
            log_level,
            smtp,
            mail,
        })
    }
}

/// Accepts `host:port` as well as the `:port` shorthand for all interfaces.
fn parse_bind_addr(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };

    let (host, port) = full
        .rsplit_once(':')
        .ok_or_else(|| format!("Invalid ATTENDANCE_BIND_ADDR '{raw}': missing port"))?;
    if host.is_empty() {
        return Err(format!("Invalid ATTENDANCE_BIND_ADDR '{raw}': missing host"));
    }
    port.parse::<u16>()
        .map_err(|e| format!("Invalid ATTENDANCE_BIND_ADDR '{raw}': {e}"))?;

    Ok(full)
}
