//! Discord permission flags and role hierarchy analysis

use std::fmt;

use crate::client::Role;

/// A single Discord permission flag.
///
/// Declaration order is bit order and is the order [`decode`] reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateInstantInvite,
    KickMembers,
    BanMembers,
    Administrator,
    ManageChannels,
    ManageGuild,
    AddReactions,
    ViewAuditLog,
    PrioritySpeaker,
    Stream,
    ViewChannel,
    SendMessages,
    SendTtsMessages,
    ManageMessages,
    EmbedLinks,
    AttachFiles,
    ReadMessageHistory,
    MentionEveryone,
    UseExternalEmojis,
    ViewGuildInsights,
    Connect,
    Speak,
    MuteMembers,
    DeafenMembers,
    MoveMembers,
    UseVad,
    ChangeNickname,
    ManageNicknames,
    ManageRoles,
    ManageWebhooks,
    ManageEmojisAndStickers,
    UseApplicationCommands,
    RequestToSpeak,
    ManageEvents,
    ManageThreads,
    CreatePublicThreads,
    CreatePrivateThreads,
    UseExternalStickers,
    SendMessagesInThreads,
    UseEmbeddedActivities,
    ModerateMembers,
    ViewCreatorMonetizationAnalytics,
    UseSoundboard,
    CreateGuildExpressions,
    CreateEvents,
    UseExternalSounds,
    SendVoiceMessages,
}

impl Permission {
    /// Every flag, in declaration order.
    pub const ALL: [Permission; 47] = [
        Permission::CreateInstantInvite,
        Permission::KickMembers,
        Permission::BanMembers,
        Permission::Administrator,
        Permission::ManageChannels,
        Permission::ManageGuild,
        Permission::AddReactions,
        Permission::ViewAuditLog,
        Permission::PrioritySpeaker,
        Permission::Stream,
        Permission::ViewChannel,
        Permission::SendMessages,
        Permission::SendTtsMessages,
        Permission::ManageMessages,
        Permission::EmbedLinks,
        Permission::AttachFiles,
        Permission::ReadMessageHistory,
        Permission::MentionEveryone,
        Permission::UseExternalEmojis,
        Permission::ViewGuildInsights,
        Permission::Connect,
        Permission::Speak,
        Permission::MuteMembers,
        Permission::DeafenMembers,
        Permission::MoveMembers,
        Permission::UseVad,
        Permission::ChangeNickname,
        Permission::ManageNicknames,
        Permission::ManageRoles,
        Permission::ManageWebhooks,
        Permission::ManageEmojisAndStickers,
        Permission::UseApplicationCommands,
        Permission::RequestToSpeak,
        Permission::ManageEvents,
        Permission::ManageThreads,
        Permission::CreatePublicThreads,
        Permission::CreatePrivateThreads,
        Permission::UseExternalStickers,
        Permission::SendMessagesInThreads,
        Permission::UseEmbeddedActivities,
        Permission::ModerateMembers,
        Permission::ViewCreatorMonetizationAnalytics,
        Permission::UseSoundboard,
        Permission::CreateGuildExpressions,
        Permission::CreateEvents,
        Permission::UseExternalSounds,
        Permission::SendVoiceMessages,
    ];

    /// Bit mask of this flag.
    pub fn bits(self) -> u64 {
        1u64 << (self as u32)
    }

    /// Label shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            Permission::CreateInstantInvite => "Create Instant Invite",
            Permission::KickMembers => "Kick Members",
            Permission::BanMembers => "Ban Members",
            Permission::Administrator => "Administrator",
            Permission::ManageChannels => "Manage Channels",
            Permission::ManageGuild => "Manage Server",
            Permission::AddReactions => "Add Reactions",
            Permission::ViewAuditLog => "View Audit Log",
            Permission::PrioritySpeaker => "Priority Speaker",
            Permission::Stream => "Stream",
            Permission::ViewChannel => "View Channels",
            Permission::SendMessages => "Send Messages",
            Permission::SendTtsMessages => "Send TTS Messages",
            Permission::ManageMessages => "Manage Messages",
            Permission::EmbedLinks => "Embed Links",
            Permission::AttachFiles => "Attach Files",
            Permission::ReadMessageHistory => "Read Message History",
            Permission::MentionEveryone => "Mention Everyone",
            Permission::UseExternalEmojis => "Use External Emojis",
            Permission::ViewGuildInsights => "View Server Insights",
            Permission::Connect => "Connect",
            Permission::Speak => "Speak",
            Permission::MuteMembers => "Mute Members",
            Permission::DeafenMembers => "Deafen Members",
            Permission::MoveMembers => "Move Members",
            Permission::UseVad => "Use Voice Activity",
            Permission::ChangeNickname => "Change Nickname",
            Permission::ManageNicknames => "Manage Nicknames",
            Permission::ManageRoles => "Manage Roles",
            Permission::ManageWebhooks => "Manage Webhooks",
            Permission::ManageEmojisAndStickers => "Manage Emojis and Stickers",
            Permission::UseApplicationCommands => "Use Application Commands",
            Permission::RequestToSpeak => "Request to Speak",
            Permission::ManageEvents => "Manage Events",
            Permission::ManageThreads => "Manage Threads",
            Permission::CreatePublicThreads => "Create Public Threads",
            Permission::CreatePrivateThreads => "Create Private Threads",
            Permission::UseExternalStickers => "Use External Stickers",
            Permission::SendMessagesInThreads => "Send Messages in Threads",
            Permission::UseEmbeddedActivities => "Use Embedded Activities",
            Permission::ModerateMembers => "Moderate Members",
            Permission::ViewCreatorMonetizationAnalytics => "View Creator Monetization Analytics",
            Permission::UseSoundboard => "Use Soundboard",
            Permission::CreateGuildExpressions => "Create Guild Expressions",
            Permission::CreateEvents => "Create Events",
            Permission::UseExternalSounds => "Use External Sounds",
            Permission::SendVoiceMessages => "Send Voice Messages",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `bits` contains every bit of `flag`.
pub fn has_flag(bits: u64, flag: Permission) -> bool {
    bits & flag.bits() == flag.bits()
}

/// Flags set in `bits`, in declaration order. Unknown bits are ignored.
pub fn decode(bits: u64) -> Vec<Permission> {
    Permission::ALL
        .into_iter()
        .filter(|flag| has_flag(bits, *flag))
        .collect()
}

/// Labels of the flags set in `bits`.
pub fn names(bits: u64) -> Vec<&'static str> {
    decode(bits).into_iter().map(Permission::label).collect()
}

/// A role that can manage roles positioned above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyIssue {
    pub role: String,
    pub above: Vec<String>,
}

impl fmt::Display for HierarchyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} can manage roles above it ({})",
            self.role,
            self.above.join(", ")
        )
    }
}

/// Flag every role holding Manage Roles that has roles with a strictly
/// greater position. Output follows the order of `roles`, and so does each
/// issue's list of roles above.
pub fn hierarchy_issues(roles: &[Role]) -> Vec<HierarchyIssue> {
    roles
        .iter()
        .filter(|role| has_flag(role.permission_bits(), Permission::ManageRoles))
        .filter_map(|role| {
            let above: Vec<String> = roles
                .iter()
                .filter(|other| other.position > role.position)
                .map(|other| other.name.clone())
                .collect();

            (!above.is_empty()).then(|| HierarchyIssue {
                role: role.name.clone(),
                above,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, name: &str, position: i64, bits: u64) -> Role {
        Role {
            id: id.to_string(),
            name: name.to_string(),
            color: 0,
            hoist: false,
            position,
            permissions: bits.to_string(),
            managed: false,
            mentionable: false,
            tags: None,
        }
    }

    #[test]
    fn test_flag_bits_match_discord() {
        assert_eq!(Permission::CreateInstantInvite.bits(), 1);
        assert_eq!(Permission::Administrator.bits(), 0x8);
        assert_eq!(Permission::ManageRoles.bits(), 0x1000_0000);
        assert_eq!(Permission::RequestToSpeak.bits(), 1 << 32);
        assert_eq!(Permission::SendVoiceMessages.bits(), 1 << 46);
    }

    #[test]
    fn test_all_is_in_bit_order() {
        for (i, flag) in Permission::ALL.iter().enumerate() {
            assert_eq!(flag.bits(), 1u64 << i);
        }
    }

    #[test]
    fn test_decode_zero() {
        assert!(decode(0).is_empty());
    }

    #[test]
    fn test_decode_in_declaration_order() {
        let bits = Permission::SendMessages.bits()
            | Permission::KickMembers.bits()
            | Permission::ManageEvents.bits();

        assert_eq!(
            names(bits),
            vec!["Kick Members", "Send Messages", "Manage Events"]
        );
    }

    #[test]
    fn test_decode_ignores_unknown_bits() {
        let bits = Permission::Speak.bits() | (1 << 60);
        assert_eq!(decode(bits), vec![Permission::Speak]);
    }

    #[test]
    fn test_decode_is_monotonic() {
        let samples = [0u64, 8, 0x1000_0000, 66_321_471, u64::MAX >> 20];
        for bits in samples {
            let base = decode(bits);
            for flag in Permission::ALL {
                let extended = decode(bits | flag.bits());
                assert!(base.iter().all(|p| extended.contains(p)));
                assert!(extended.contains(&flag));
            }
        }
    }

    #[test]
    fn test_has_flag() {
        let bits = Permission::Administrator.bits() | Permission::BanMembers.bits();
        assert!(has_flag(bits, Permission::Administrator));
        assert!(has_flag(bits, Permission::BanMembers));
        assert!(!has_flag(bits, Permission::KickMembers));
    }

    #[test]
    fn test_hierarchy_flags_manager_below_admin() {
        let roles = vec![
            role("1", "Admin", 2, Permission::Administrator.bits()),
            role("2", "Mod", 1, Permission::ManageRoles.bits()),
        ];

        let issues = hierarchy_issues(&roles);

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "Mod can manage roles above it (Admin)"
        );
    }

    #[test]
    fn test_hierarchy_clean_when_managers_on_top() {
        let roles = vec![
            role("1", "Owner", 3, Permission::ManageRoles.bits()),
            role("2", "Co-Owner", 3, Permission::ManageRoles.bits()),
            role("3", "Member", 1, Permission::SendMessages.bits()),
            role("4", "@everyone", 0, 0),
        ];

        assert!(hierarchy_issues(&roles).is_empty());
    }

    #[test]
    fn test_hierarchy_lists_all_roles_above() {
        let roles = vec![
            role("1", "Owner", 4, 0),
            role("2", "Admin", 3, 0),
            role("3", "Helper", 2, Permission::ManageRoles.bits()),
            role("4", "Member", 1, 0),
        ];

        let issues = hierarchy_issues(&roles);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].role, "Helper");
        assert_eq!(issues[0].above, vec!["Owner", "Admin"]);
    }

    #[test]
    fn test_hierarchy_ignores_roles_without_manage_roles() {
        let roles = vec![
            role("1", "Top", 2, 0),
            role("2", "Kicker", 1, Permission::KickMembers.bits()),
        ];

        assert!(hierarchy_issues(&roles).is_empty());
    }
}
