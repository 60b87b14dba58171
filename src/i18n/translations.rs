// key, [english, hindi, bengali]
pub(super) const ENTRIES: &[(&str, [&str; 3])] = &[
    ("app.title", ["Farm Guard", "फार्म गार्ड", "ফার্ম গার্ড"]),
    ("nav.dashboard", ["Dashboard", "डैशबोर्ड", "ড্যাশবোর্ড"]),
    ("nav.amu", ["Antimicrobial Usage", "रोगाणुरोधी उपयोग", "অ্যান্টিমাইক্রোবিয়াল ব্যবহার"]),
    ("nav.prescriptions", ["Prescriptions", "नुस्खे", "প্রেসক্রিপশন"]),
    ("nav.scanner", ["Prescription Scanner", "नुस्खा स्कैनर", "প্রেসক্রিপশন স্ক্যানার"]),
    ("nav.submissions", ["Regulatory Submissions", "नियामक प्रस्तुतियाँ", "নিয়ন্ত্রক জমা"]),
    ("nav.community", ["Community", "समुदाय", "সম্প্রদায়"]),
    ("nav.assistant", ["Assistant", "सहायक", "সহকারী"]),
    ("nav.alerts", ["Alerts", "अलर्ट", "সতর্কতা"]),
    ("nav.food_safety", ["Food Safety", "खाद्य सुरक्षा", "খাদ্য নিরাপত্তা"]),
    ("field.veterinarian", ["Veterinarian", "पशु चिकित्सक", "পশু চিকিৎসক"]),
    ("field.animal_id", ["Animal ID", "पशु आईडी", "পশু আইডি"]),
    ("field.drug_name", ["Drug Name", "दवा का नाम", "ওষুধের নাম"]),
    ("field.issue_date", ["Issue Date", "जारी करने की तिथि", "ইস্যুর তারিখ"]),
    ("field.dosage", ["Dosage", "खुराक", "মাত্রা"]),
    ("field.frequency", ["Frequency", "आवृत्ति", "ফ্রিকোয়েন্সি"]),
    ("field.duration", ["Duration", "अवधि", "সময়কাল"]),
    ("field.notes", ["Notes", "टिप्पणियाँ", "নোট"]),
    ("field.withdrawal_period", ["Withdrawal Period", "निकासी अवधि", "প্রত্যাহার সময়কাল"]),
    ("status.pending", ["Pending", "लंबित", "মুলতুবি"]),
    ("status.verified", ["Verified", "सत्यापित", "যাচাইকৃত"]),
    ("status.expired", ["Expired", "समाप्त", "মেয়াদোত্তীর্ণ"]),
    ("action.scan", ["Scan Prescription", "नुस्खा स्कैन करें", "প্রেসক্রিপশন স্ক্যান করুন"]),
    ("action.save", ["Save", "सहेजें", "সংরক্ষণ করুন"]),
    ("action.speak", ["Read Aloud", "पढ़कर सुनाएँ", "জোরে পড়ুন"]),
    ("action.send", ["Send", "भेजें", "পাঠান"]),
    ("chat.placeholder", ["Ask about your livestock...", "अपने पशुओं के बारे में पूछें...", "আপনার পশু সম্পর্কে জিজ্ঞাসা করুন..."]),
    ("chat.greeting", [
        "Hello! How can I help with your farm today?",
        "नमस्ते! आज मैं आपके फार्म में कैसे मदद कर सकता हूँ?",
        "নমস্কার! আজ আমি আপনার খামারে কীভাবে সাহায্য করতে পারি?",
    ]),
    ("chat.error", [
        "Sorry, the assistant is unavailable right now.",
        "क्षमा करें, सहायक अभी उपलब्ध नहीं है।",
        "দুঃখিত, সহকারী এখন উপলব্ধ নয়।",
    ]),
    ("ocr.failed", [
        "Could not read the prescription. Please try again.",
        "नुस्खा पढ़ा नहीं जा सका। कृपया पुनः प्रयास करें।",
        "প্রেসক্রিপশন পড়া যায়নি। আবার চেষ্টা করুন।",
    ]),
    ("alerts.unread", ["Unread alerts", "अपठित अलर्ट", "অপঠিত সতর্কতা"]),
    ("alerts.mrl_exceeded", ["MRL exceeded", "एमआरएल सीमा पार", "এমআরএল সীমা অতিক্রম"]),
    ("alerts.withdrawal_active", [
        "Animal is in withdrawal period",
        "पशु निकासी अवधि में है",
        "পশুটি প্রত্যাহার সময়কালে আছে",
    ]),
];
