use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artifactl")]
#[command(version)]
#[command(about = "Configure an Artifactory instance declaratively or call its REST API directly", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Target server or base Artifactory URL
    #[arg(short = 's', long, global = true)]
    pub server: Option<String>,

    /// Username for Artifactory authentication
    #[arg(short = 'u', long, global = true)]
    pub username: Option<String>,

    /// Password for Artifactory authentication (prompted when absent)
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a declarative configuration file to a target instance
    Apply(ApplyArgs),

    /// Instance-level reads: {health,information,configuration}
    #[command(subcommand)]
    Artifactory(InstanceAction),

    /// Manage the instance License: {information,install}
    #[command(subcommand)]
    License(LicenseAction),

    /// Manage Users: {list,detail,create,update,delete}
    #[command(subcommand)]
    Users(UserAction),

    /// Manage Groups: {list,detail,create,update,delete}
    #[command(subcommand)]
    Groups(GroupAction),

    /// Manage Repositories: {list,detail,create,update,delete}
    #[command(subcommand)]
    Repositories(RepositoryAction),

    /// Manage Permissions: {list,detail,create,delete}
    #[command(subcommand)]
    Permissions(PermissionAction),
}

// ============================================================================
// Batch-apply mode
// ============================================================================

#[derive(Parser)]
pub struct ApplyArgs {
    /// Configuration JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config_file: Option<PathBuf>,

    /// Target server or base Artifactory URL
    #[arg(short = 't', long = "targetServer")]
    pub target_server: Option<String>,

    /// Allow creates to replace any conflicting resources
    #[arg(short = 'D', long)]
    pub destructive: bool,

    /// Prevent replacement of conflicting resources; overrides destructive
    #[arg(short = 'S', long)]
    pub safe: bool,

    /// Include debug information in output
    #[arg(long)]
    pub debug: bool,
}

// ============================================================================
// Ad-hoc single-call mode
// ============================================================================

#[derive(Subcommand)]
pub enum InstanceAction {
    /// Get the Health Status of the instance
    Health,
    /// Get Information about the instance
    Information,
    /// Get the Configuration of the instance
    Configuration,
}

#[derive(Subcommand)]
pub enum LicenseAction {
    /// Get information about the current License
    Information,
    /// Install a License Key contained in a file
    Install {
        /// File containing the License Key to install
        #[arg(long = "keyFile")]
        key_file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List all Users
    List,
    /// Get the details of a User
    Detail {
        /// Username to return the details of
        #[arg(long)]
        name: String,
    },
    /// Create or replace a User from a JSON file
    Create {
        /// JSON file with the User payload; its base name (minus extension)
        /// is used as the Username
        #[arg(long = "userFile")]
        user_file: PathBuf,
    },
    /// Update an existing User from a JSON file
    Update {
        /// JSON file with the User payload; its base name (minus extension)
        /// is used as the Username
        #[arg(long = "userFile")]
        user_file: PathBuf,
    },
    /// Delete a User
    Delete {
        /// Username to delete
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// List all Groups
    List,
    /// Get the details of a Group
    Detail {
        /// Groupname to return the details of
        #[arg(long)]
        name: String,
    },
    /// Create or replace a Group from a JSON file
    Create {
        /// JSON file with the Group payload; its base name (minus extension)
        /// is used as the Groupname
        #[arg(long = "groupFile")]
        group_file: PathBuf,
    },
    /// Update an existing Group from a JSON file
    Update {
        /// JSON file with the Group payload; its base name (minus extension)
        /// is used as the Groupname
        #[arg(long = "groupFile")]
        group_file: PathBuf,
    },
    /// Delete a Group
    Delete {
        /// Groupname to delete
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum RepositoryAction {
    /// List all Repositories, or all Repositories of a specific type
    List {
        /// Type of repositories to return; all types when not specified
        #[arg(long = "type", value_parser = PossibleValuesParser::new(["local", "remote", "virtual"]))]
        repo_type: Option<String>,
    },
    /// Get the configuration of a Repository
    Detail {
        /// Key of the Repository to return the configuration of
        #[arg(long)]
        key: String,
    },
    /// Create or replace a Repository from a JSON file
    Create {
        /// JSON file with the Repository payload; its base name (minus
        /// extension) is used as the Key
        #[arg(long = "repositoryFile")]
        repository_file: PathBuf,
    },
    /// Update an existing Repository from a JSON file
    Update {
        /// JSON file with the Repository payload; its base name (minus
        /// extension) is used as the Key
        #[arg(long = "repositoryFile")]
        repository_file: PathBuf,
    },
    /// Delete a Repository
    Delete {
        /// Key of the Repository to delete
        #[arg(long)]
        key: String,
    },
}

#[derive(Subcommand)]
pub enum PermissionAction {
    /// List all Permissions
    List,
    /// Get the details of a Permission
    Detail {
        /// Permission name to return the details of
        #[arg(long)]
        name: String,
    },
    /// Create a Permission from a JSON file
    Create {
        /// JSON file with the Permission payload; its base name (minus
        /// extension) is used as the Permission name
        #[arg(long = "permissionFile")]
        permission_file: PathBuf,
    },
    /// Delete a Permission
    Delete {
        /// Permission name to delete
        #[arg(long)]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_accepts_original_flag_spellings() {
        let cli = Cli::try_parse_from([
            "artifactl",
            "apply",
            "--configFile",
            "art.json",
            "--targetServer",
            "art.example.com",
            "-u",
            "admin",
            "-D",
        ])
        .unwrap();
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.config_file.unwrap().to_str(), Some("art.json"));
                assert_eq!(args.target_server.as_deref(), Some("art.example.com"));
                assert!(args.destructive);
                assert!(!args.safe);
            }
            _ => panic!("expected apply"),
        }
        assert_eq!(cli.username.as_deref(), Some("admin"));
    }

    #[test]
    fn adhoc_users_create_takes_user_file() {
        let cli = Cli::try_parse_from([
            "artifactl",
            "--server",
            "art.example.com",
            "users",
            "create",
            "--userFile",
            "testuser.json",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("art.example.com"));
        match cli.command {
            Command::Users(UserAction::Create { user_file }) => {
                assert_eq!(user_file.to_str(), Some("testuser.json"));
            }
            _ => panic!("expected users create"),
        }
    }

    #[test]
    fn repository_list_type_is_restricted() {
        assert!(
            Cli::try_parse_from([
                "artifactl",
                "repositories",
                "list",
                "--type",
                "federated"
            ])
            .is_err()
        );
        let cli =
            Cli::try_parse_from(["artifactl", "repositories", "list", "--type", "local"]).unwrap();
        match cli.command {
            Command::Repositories(RepositoryAction::List { repo_type }) => {
                assert_eq!(repo_type.as_deref(), Some("local"));
            }
            _ => panic!("expected repositories list"),
        }
    }
}
