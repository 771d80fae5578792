//! Numeric reply registry.
//!
//! Three-digit reply codes are mapped to the symbolic names used by RFC 1459,
//! RFC 2812 and the modern IRC documentation. The table is compiled in and
//! indexed once on first use; nothing can mutate it afterwards.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `(code, symbolic name)` pairs, sorted by code.
pub const NUMERICS: &[(&str, &str)] = &[
    // Connection registration
    ("001", "RPL_WELCOME"),
    ("002", "RPL_YOURHOST"),
    ("003", "RPL_CREATED"),
    ("004", "RPL_MYINFO"),
    ("005", "RPL_ISUPPORT"),
    ("010", "RPL_BOUNCE"),
    ("042", "RPL_YOURID"),
    // Trace, stats and server information
    ("200", "RPL_TRACELINK"),
    ("201", "RPL_TRACECONNECTING"),
    ("202", "RPL_TRACEHANDSHAKE"),
    ("203", "RPL_TRACEUNKNOWN"),
    ("204", "RPL_TRACEOPERATOR"),
    ("205", "RPL_TRACEUSER"),
    ("206", "RPL_TRACESERVER"),
    ("207", "RPL_TRACESERVICE"),
    ("208", "RPL_TRACENEWTYPE"),
    ("209", "RPL_TRACECLASS"),
    ("210", "RPL_TRACERECONNECT"),
    ("211", "RPL_STATSLINKINFO"),
    ("212", "RPL_STATSCOMMANDS"),
    ("216", "RPL_STATSKLINE"),
    ("219", "RPL_ENDOFSTATS"),
    ("220", "RPL_STATSDLINE"),
    ("221", "RPL_UMODEIS"),
    ("226", "RPL_STATSSHUN"),
    ("234", "RPL_SERVLIST"),
    ("235", "RPL_SERVLISTEND"),
    ("242", "RPL_STATSUPTIME"),
    ("243", "RPL_STATSOLINE"),
    ("249", "RPL_STATSDEBUG"),
    ("251", "RPL_LUSERCLIENT"),
    ("252", "RPL_LUSEROP"),
    ("253", "RPL_LUSERUNKNOWN"),
    ("254", "RPL_LUSERCHANNELS"),
    ("255", "RPL_LUSERME"),
    ("256", "RPL_ADMINME"),
    ("257", "RPL_ADMINLOC1"),
    ("258", "RPL_ADMINLOC2"),
    ("259", "RPL_ADMINEMAIL"),
    ("261", "RPL_TRACELOG"),
    ("262", "RPL_TRACEEND"),
    ("263", "RPL_TRYAGAIN"),
    ("265", "RPL_LOCALUSERS"),
    ("266", "RPL_GLOBALUSERS"),
    ("271", "RPL_SILELIST"),
    ("272", "RPL_ENDOFSILELIST"),
    ("276", "RPL_WHOISCERTFP"),
    ("281", "RPL_ACCEPTLIST"),
    ("282", "RPL_ENDOFACCEPT"),
    // Command replies
    ("300", "RPL_NONE"),
    ("301", "RPL_AWAY"),
    ("302", "RPL_USERHOST"),
    ("303", "RPL_ISON"),
    ("305", "RPL_UNAWAY"),
    ("306", "RPL_NOWAWAY"),
    ("311", "RPL_WHOISUSER"),
    ("312", "RPL_WHOISSERVER"),
    ("313", "RPL_WHOISOPERATOR"),
    ("314", "RPL_WHOWASUSER"),
    ("315", "RPL_ENDOFWHO"),
    ("317", "RPL_WHOISIDLE"),
    ("318", "RPL_ENDOFWHOIS"),
    ("319", "RPL_WHOISCHANNELS"),
    ("321", "RPL_LISTSTART"),
    ("322", "RPL_LIST"),
    ("323", "RPL_LISTEND"),
    ("324", "RPL_CHANNELMODEIS"),
    ("325", "RPL_UNIQOPIS"),
    ("329", "RPL_CREATIONTIME"),
    ("330", "RPL_WHOISACCOUNT"),
    ("331", "RPL_NOTOPIC"),
    ("332", "RPL_TOPIC"),
    ("333", "RPL_TOPICWHOTIME"),
    ("335", "RPL_WHOISBOT"),
    ("338", "RPL_WHOISACTUALLY"),
    ("340", "RPL_USERIP"),
    ("341", "RPL_INVITING"),
    ("342", "RPL_SUMMONING"),
    ("346", "RPL_INVITELIST"),
    ("347", "RPL_ENDOFINVITELIST"),
    ("348", "RPL_EXCEPTLIST"),
    ("349", "RPL_ENDOFEXCEPTLIST"),
    ("351", "RPL_VERSION"),
    ("352", "RPL_WHOREPLY"),
    ("353", "RPL_NAMREPLY"),
    ("354", "RPL_WHOSPCRPL"),
    ("364", "RPL_LINKS"),
    ("365", "RPL_ENDOFLINKS"),
    ("366", "RPL_ENDOFNAMES"),
    ("367", "RPL_BANLIST"),
    ("368", "RPL_ENDOFBANLIST"),
    ("369", "RPL_ENDOFWHOWAS"),
    ("371", "RPL_INFO"),
    ("372", "RPL_MOTD"),
    ("374", "RPL_ENDOFINFO"),
    ("375", "RPL_MOTDSTART"),
    ("376", "RPL_ENDOFMOTD"),
    ("378", "RPL_WHOISHOST"),
    ("379", "RPL_WHOISMODES"),
    ("381", "RPL_YOUREOPER"),
    ("382", "RPL_REHASHING"),
    ("383", "RPL_YOURESERVICE"),
    ("391", "RPL_TIME"),
    ("392", "RPL_USERSSTART"),
    ("393", "RPL_USERS"),
    ("394", "RPL_ENDOFUSERS"),
    ("395", "RPL_NOUSERS"),
    ("396", "RPL_HOSTHIDDEN"),
    // Error replies
    ("400", "ERR_UNKNOWNERROR"),
    ("401", "ERR_NOSUCHNICK"),
    ("402", "ERR_NOSUCHSERVER"),
    ("403", "ERR_NOSUCHCHANNEL"),
    ("404", "ERR_CANNOTSENDTOCHAN"),
    ("405", "ERR_TOOMANYCHANNELS"),
    ("406", "ERR_WASNOSUCHNICK"),
    ("407", "ERR_TOOMANYTARGETS"),
    ("408", "ERR_NOSUCHSERVICE"),
    ("409", "ERR_NOORIGIN"),
    ("410", "ERR_INVALIDCAPCMD"),
    ("411", "ERR_NORECIPIENT"),
    ("412", "ERR_NOTEXTTOSEND"),
    ("413", "ERR_NOTOPLEVEL"),
    ("414", "ERR_WILDTOPLEVEL"),
    ("415", "ERR_BADMASK"),
    ("417", "ERR_INPUTTOOLONG"),
    ("421", "ERR_UNKNOWNCOMMAND"),
    ("422", "ERR_NOMOTD"),
    ("423", "ERR_NOADMININFO"),
    ("424", "ERR_FILEERROR"),
    ("431", "ERR_NONICKNAMEGIVEN"),
    ("432", "ERR_ERRONEOUSNICKNAME"),
    ("433", "ERR_NICKNAMEINUSE"),
    ("436", "ERR_NICKCOLLISION"),
    ("437", "ERR_UNAVAILRESOURCE"),
    ("441", "ERR_USERNOTINCHANNEL"),
    ("442", "ERR_NOTONCHANNEL"),
    ("443", "ERR_USERONCHANNEL"),
    ("444", "ERR_NOLOGIN"),
    ("445", "ERR_SUMMONDISABLED"),
    ("446", "ERR_USERSDISABLED"),
    ("447", "ERR_NONICKCHANGE"),
    ("451", "ERR_NOTREGISTERED"),
    ("456", "ERR_ACCEPTFULL"),
    ("457", "ERR_ACCEPTEXIST"),
    ("458", "ERR_ACCEPTNOT"),
    ("461", "ERR_NEEDMOREPARAMS"),
    ("462", "ERR_ALREADYREGISTERED"),
    ("463", "ERR_NOPERMFORHOST"),
    ("464", "ERR_PASSWDMISMATCH"),
    ("465", "ERR_YOUREBANNEDCREEP"),
    ("466", "ERR_YOUWILLBEBANNED"),
    ("467", "ERR_KEYSET"),
    ("471", "ERR_CHANNELISFULL"),
    ("472", "ERR_UNKNOWNMODE"),
    ("473", "ERR_INVITEONLYCHAN"),
    ("474", "ERR_BANNEDFROMCHAN"),
    ("475", "ERR_BADCHANNELKEY"),
    ("476", "ERR_BADCHANMASK"),
    ("477", "ERR_NEEDREGGEDNICK"),
    ("478", "ERR_BANLISTFULL"),
    ("479", "ERR_BADCHANNAME"),
    ("481", "ERR_NOPRIVILEGES"),
    ("482", "ERR_CHANOPRIVSNEEDED"),
    ("483", "ERR_CANTKILLSERVER"),
    ("484", "ERR_RESTRICTED"),
    ("485", "ERR_UNIQOPPRIVSNEEDED"),
    ("489", "ERR_SECUREONLYCHAN"),
    ("491", "ERR_NOOPERHOST"),
    ("501", "ERR_UMODEUNKNOWNFLAG"),
    ("502", "ERR_USERSDONTMATCH"),
    ("511", "ERR_SILELISTFULL"),
    ("520", "ERR_OPERONLY"),
    ("524", "ERR_HELPNOTFOUND"),
    ("525", "ERR_INVALIDKEY"),
    ("573", "ERR_CANNOTSENDRP"),
    // Extensions (STARTTLS, KNOCK, MONITOR, METADATA)
    ("606", "RPL_MAP"),
    ("607", "RPL_MAPEND"),
    ("632", "RPL_RULESTART"),
    ("633", "RPL_RULES"),
    ("634", "RPL_ENDOFRULES"),
    ("635", "ERR_NORULES"),
    ("646", "RPL_STATSPLINE"),
    ("670", "RPL_STARTTLS"),
    ("671", "RPL_WHOISSECURE"),
    ("691", "ERR_STARTTLS"),
    ("696", "ERR_INVALIDMODEPARAM"),
    ("704", "RPL_HELPSTART"),
    ("705", "RPL_HELPTXT"),
    ("706", "RPL_ENDOFHELP"),
    ("710", "RPL_KNOCK"),
    ("711", "RPL_KNOCKDLVR"),
    ("712", "ERR_TOOMANYKNOCK"),
    ("713", "ERR_CHANOPEN"),
    ("714", "ERR_KNOCKONCHAN"),
    ("723", "ERR_NOPRIVS"),
    ("728", "RPL_QUIETLIST"),
    ("729", "RPL_ENDOFQUIETLIST"),
    ("730", "RPL_MONONLINE"),
    ("731", "RPL_MONOFFLINE"),
    ("732", "RPL_MONLIST"),
    ("733", "RPL_ENDOFMONLIST"),
    ("734", "ERR_MONLISTFULL"),
    ("760", "RPL_WHOISKEYVALUE"),
    ("761", "RPL_KEYVALUE"),
    ("762", "RPL_METADATAEND"),
    ("764", "ERR_METADATALIMIT"),
    ("765", "ERR_TARGETINVALID"),
    ("766", "ERR_NOMATCHINGKEY"),
    ("767", "ERR_KEYINVALID"),
    ("768", "ERR_KEYNOTSET"),
    ("769", "ERR_KEYNOPERMISSION"),
    // Account and SASL
    ("900", "RPL_LOGGEDIN"),
    ("901", "RPL_LOGGEDOUT"),
    ("902", "ERR_NICKLOCKED"),
    ("903", "RPL_SASLSUCCESS"),
    ("904", "ERR_SASLFAIL"),
    ("905", "ERR_SASLTOOLONG"),
    ("906", "ERR_SASLABORT"),
    ("907", "ERR_SASLALREADY"),
    ("908", "RPL_SASLMECHS"),
];

static BY_CODE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NUMERICS.iter().copied().collect());

static BY_NAME: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NUMERICS.iter().map(|&(code, name)| (name, code)).collect());

/// Look up the symbolic name of a three-digit reply code.
///
/// Matching is exact: `"1"` or `" 001"` do not resolve.
#[inline]
pub fn symbolic_name(code: &str) -> Option<&'static str> {
    BY_CODE.get(code).copied()
}

/// Reverse lookup: the three-digit code for a symbolic name.
#[inline]
pub fn numeric_code(name: &str) -> Option<&'static str> {
    BY_NAME.get(name).copied()
}

/// Whether a token has the shape of a numeric reply (exactly three ASCII digits).
#[inline]
pub fn is_numeric(token: &str) -> bool {
    token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a command token as it appears on the wire.
///
/// Known numerics become their symbolic name; anything else, including
/// unknown numerics, is returned untouched.
pub fn resolve_command(token: &str) -> Cow<'_, str> {
    if is_numeric(token) {
        if let Some(name) = symbolic_name(token) {
            return Cow::Borrowed(name);
        }
    }
    Cow::Borrowed(token)
}

/// Whether a resolved command names an error reply.
#[inline]
pub fn is_error_reply(command: &str) -> bool {
    command.starts_with("ERR_")
}
