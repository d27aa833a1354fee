// Scoped logging: a message is emitted only when the active `LogConfig` allows
// its level for the given scope. The level token is the lowercase tracing macro
// name (`error`, `warn`, `info`, `debug`, `trace`).

#[macro_export]
macro_rules! scoped_log {
    (error, $scope:expr, $($arg:tt)*) => {
        $crate::scoped_log!(@emit error, ERROR, $scope, $($arg)*)
    };
    (warn, $scope:expr, $($arg:tt)*) => {
        $crate::scoped_log!(@emit warn, WARN, $scope, $($arg)*)
    };
    (info, $scope:expr, $($arg:tt)*) => {
        $crate::scoped_log!(@emit info, INFO, $scope, $($arg)*)
    };
    (debug, $scope:expr, $($arg:tt)*) => {
        $crate::scoped_log!(@emit debug, DEBUG, $scope, $($arg)*)
    };
    (trace, $scope:expr, $($arg:tt)*) => {
        $crate::scoped_log!(@emit trace, TRACE, $scope, $($arg)*)
    };
    (@emit $mac:ident, $level:ident, $scope:expr, $($arg:tt)*) => {{
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            $crate::logging::$mac!(scope = $scope, $($arg)*);
        }
    }};
}

#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scopes::LOCOMOTION, $($arg)*)
    };
}

#[macro_export]
macro_rules! climb_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scopes::CLIMB, $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, $crate::logging::scopes::INPUT, $($arg)*)
    };
}
