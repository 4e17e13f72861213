//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Credential rules
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_AVATAR_INITIALS: usize = 2;

// Local cache keys
pub const CACHE_KEY_AUTH: &str = "auth";
pub const CACHE_KEY_ACTIVITY_LOGS: &str = "activityLogs";
pub const CACHE_KEY_ERROR_LOGS: &str = "errorLogs";
pub const CACHE_KEY_CHANGE_LOGS: &str = "changeLogs";

// Logical screen names recorded in the audit trail
pub const LOCATION_LOGIN: &str = "Login";
pub const LOCATION_LOGOUT: &str = "Logout";
pub const LOCATION_LOGIN_PAGE: &str = "Login Page";
pub const LOCATION_PASSWORD_RECOVERY: &str = "Password Recovery";
pub const LOCATION_SIGN_UP: &str = "Sign Up";
pub const LOCATION_USERS: &str = "Users";
pub const LOCATION_CLIENTS: &str = "Clients";
pub const LOCATION_TASKS: &str = "Tasks";

// Form names recorded in error logs
pub const FORM_LOGIN: &str = "Login Form";
pub const FORM_PASSWORD_RECOVERY: &str = "Password Recovery Form";
pub const FORM_SIGN_UP: &str = "Sign Up Form";

// User-facing messages. Login and recovery failures share one text so the
// caller cannot tell an unknown address from a wrong password.
pub const MSG_LOGIN_SUCCESS: &str = "Signed in successfully";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const MSG_ACCOUNT_INACTIVE: &str = "This account is inactive. Contact an administrator.";
pub const MSG_SERVER_UNREACHABLE: &str = "Unable to reach the server. Try again later.";
pub const MSG_RECOVERY_SENT: &str = "Password recovery email sent";
pub const MSG_RECOVERY_FAILED: &str = "Could not send a recovery email for that address";
pub const MSG_SIGN_UP_SUCCESS: &str = "Account created. You can now sign in.";

// Remote service routes
pub const ROUTE_USERS: &str = "/api/users";
pub const ROUTE_CLIENTS: &str = "/api/clients";
pub const ROUTE_TASKS: &str = "/api/tasks";
pub const ROUTE_TASKS_COUNT_BY_CLIENT: &str = "/api/tasks/count-by-client";
pub const ROUTE_TASKS_COUNT_BY_USER: &str = "/api/tasks/count-by-user";
pub const ROUTE_AUTH_LOGIN: &str = "/api/auth/login";
pub const ROUTE_AUTH_SIGNUP: &str = "/api/auth/signup";
pub const ROUTE_AUTH_LOGOUT: &str = "/api/auth/logout";
pub const ROUTE_AUTH_SESSION: &str = "/api/auth/session";
pub const ROUTE_AUTH_RECOVER: &str = "/api/auth/recover";
pub const ROUTE_ACTIVITY_LOGS: &str = "/api/activity-logs";
pub const ROUTE_ERROR_LOGS: &str = "/api/error-logs";
pub const ROUTE_CHANGE_LOGS: &str = "/api/change-logs";
